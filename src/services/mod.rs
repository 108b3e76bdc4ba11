//! Business logic services layer

pub mod notification;
pub mod permission_workflow;
pub mod preference_resolver;
pub mod preference_service;
pub mod role_manager;

pub use notification::{Notification, NotificationLevel, NotificationSink, Notifications, Submission};
pub use permission_workflow::{CreateRole, RemoveRole, UpdateRole};
pub use preference_resolver::PreferenceResolver;
pub use preference_service::PreferenceService;
pub use role_manager::RoleManager;
