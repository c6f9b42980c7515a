//! Page objects for the mail client's login and folders/labels screens.

mod login;
mod settings;

pub use login::LoginPage;
pub use settings::{ItemDescriptor, ItemKind, OperationResult, PageState, SettingsListPage};
