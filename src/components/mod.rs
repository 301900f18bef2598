// ABOUTME: UI components for the TUI interface including the registration wizard, sign-in and home screens

pub mod home;
pub mod layout;
pub mod registration;
pub mod sign_in;
pub mod theme;

pub use home::HomeComponent;
pub use layout::LayoutComponent;
pub use registration::RegistrationComponent;
pub use sign_in::SignInComponent;
