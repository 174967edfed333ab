mod crypto;
mod db;
mod extractor;
mod guard;

pub use crypto::{generate_token, hash_token};
pub use db::{create_session, get_user_from_token};
pub use extractor::{token_from_headers, AuthUser};
pub use guard::{load_recipe_access, lock_recipe_access, parse_status, RecipeAccess};
