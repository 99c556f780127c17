pub mod defaults;
pub mod effective;
pub mod record;

pub use defaults::{default_card_testimonial, default_record};
pub use effective::{
    AboutEffective, CarouselEffective, ProfileSummaryEffective, ServicesEffective,
};
pub use record::{EducationEntry, ProfileRecord, ServiceItem, Testimonial};
