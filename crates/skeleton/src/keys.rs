//! Container keys for the application layer.
use skeleton_core::container::Key;

use crate::repositories::UserRepository;
use crate::services::UserService;

pub const USER_REPOSITORY: Key<dyn UserRepository> = Key::new("userRepository");
pub const USER_SERVICE: Key<dyn UserService> = Key::new("userService");
