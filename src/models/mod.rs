//! Data models for FieldReserve

pub mod booking;
pub mod category;
pub mod field;
pub mod pagination;
pub mod schedule;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingStatus};
pub use category::Category;
pub use field::{Field, FieldWithCategory};
pub use pagination::{PageRequest, PaginatedResponse};
pub use schedule::{Schedule, ScheduleResponse};
pub use user::{Role, User, UserShort};
