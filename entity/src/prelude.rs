pub use super::folders::Entity as Folders;
pub use super::sections::Entity as Sections;
pub use super::smart_folders::Entity as SmartFolders;
pub use super::tags::Entity as Tags;
pub use super::tasks::Entity as Tasks;
pub use super::users::Entity as Users;
