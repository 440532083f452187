pub use super::vins::Entity as Vins;
