pub mod booking;
pub mod review;
pub mod site_content;
pub mod user;

pub use booking::{Booking, BookingPatch, BookingStatus, NewBooking};
pub use review::{NewReview, Review, ReviewPatch, MIN_REVIEW_LEN};
pub use site_content::SiteContent;
pub use user::{Role, User, UserPatch};
