//! Recipe persistence: the transactional writer, the verification workflow
//! and the read model.

pub mod deadline;
pub mod normalizer;
pub mod projection;
pub mod ratings;
pub mod review;
pub mod review_content;
pub mod writer;
