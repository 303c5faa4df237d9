pub mod blog;
pub mod contact;
pub mod favorite;
pub mod message;
pub mod order;
pub mod portfolio;
pub mod project;
pub mod setting;
pub mod user;

pub use blog::{slugify, BlogChanges, BlogDraft, BlogFilter, BlogPost, BlogStats};
pub use contact::{ContactChanges, ContactStats, ContactSubmission, NewContact};
pub use favorite::{Favorite, FavoriteWithProject};
pub use message::{Message, MessageStats, MessageWithUsers, NewMessage};
pub use order::{NewOrder, Order, OrderStats};
pub use portfolio::{Category, PortfolioChanges, PortfolioDraft, PortfolioFilter, PortfolioProject};
pub use project::{NewProject, Project, ProjectChanges, ProjectFilter, ProjectStats, ProjectStatusChange};
pub use setting::{settings_object, Setting};
pub use user::{NewUser, ProfileChanges, User, UserFilter, UserStats};
