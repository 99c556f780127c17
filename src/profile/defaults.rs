use super::record::{EducationEntry, ProfileRecord, ServiceItem, Testimonial};
use once_cell::sync::Lazy;

const ICON_DIR: &str = "/Storefront/Doctor Widget/Services And Conditions";

fn testimonial(quote: &str, author: &str, age: u32, condition: &str, rating: u8) -> Testimonial {
    Testimonial {
        quote: quote.into(),
        author: author.into(),
        age,
        condition: condition.into(),
        rating,
    }
}

static DEFAULT_RECORD: Lazy<ProfileRecord> = Lazy::new(|| ProfileRecord {
    about_text: Some(
        "Dr. Bellamy is a board-certified internist focused on preventive care and \
         long-term management of chronic conditions."
            .into(),
    ),
    education: Some(vec![
        EducationEntry {
            college: "Johns Hopkins School of Medicine".into(),
            activity: "Doctor of Medicine".into(),
        },
        EducationEntry {
            college: "Stanford Health Care".into(),
            activity: "Fellowship in Preventive Medicine".into(),
        },
    ]),
    hospitals: Some(vec![
        "St. Mary's General Hospital".into(),
        "Riverside Medical Center".into(),
    ]),
    certificates: Some(vec![
        "American Board of Internal Medicine".into(),
        "Advanced Cardiac Life Support".into(),
    ]),
    languages: Some(vec!["English".into(), "Spanish".into()]),
    services: Some(vec![
        ServiceItem::new("Cardiovascular Care", &format!("{ICON_DIR}/HeartMonitor.svg")),
        ServiceItem::new("Preventive Medicine", &format!("{ICON_DIR}/MedBag.svg")),
        ServiceItem::new("General Consultation", &format!("{ICON_DIR}/HealthPlus.svg")),
    ]),
    conditions: Some(vec![
        "Diabetes Management".into(),
        "Hypertension".into(),
        "High Cholesterol".into(),
        "Preventive Care".into(),
        "Cardiovascular Health".into(),
        "Weight Management".into(),
    ]),
    testimonials: Some(vec![
        testimonial(
            "Dr. Bellamy was incredibly thorough and caring. He took the time to explain \
             everything clearly and made me feel comfortable throughout the entire process.",
            "Sarah Johnson",
            45,
            "Diabetes",
            5,
        ),
        testimonial(
            "The best doctor I've ever had. His approach to preventive care is outstanding \
             and he really listens to your concerns.",
            "Michael Chen",
            52,
            "Heart Disease",
            5,
        ),
        testimonial(
            "Professional, knowledgeable, and genuinely caring. Dr. Bellamy has helped me \
             manage my condition effectively.",
            "Emily Rodriguez",
            38,
            "Lung Disease",
            5,
        ),
    ]),
    overall_rating: Some(4.9),
    total_reviews: Some(127),
    recommended_rate: Some(98),
    doctor_name: Some("Dr. James Bellamy".into()),
    specialty: Some("Internal Medicine".into()),
    patients: Some("2,500+".into()),
    experience: Some("15+ years".into()),
    rating: Some("4.9".into()),
    image_src: Some("/Storefront/Doctor Widget/DoctorImage.png".into()),
});

static DEFAULT_CARD: Lazy<Testimonial> = Lazy::new(|| {
    testimonial(
        "Dr. Bellamy was incredibly thorough and caring. He took the time to explain \
         everything clearly and made me feel comfortable throughout the entire process.",
        "Sarah Johnson",
        45,
        "Diabetes Management",
        5,
    )
});

/// Built-in record every widget falls back to.
pub fn default_record() -> &'static ProfileRecord {
    &DEFAULT_RECORD
}

/// Testimonial shown by a standalone card when nothing else applies.
pub fn default_card_testimonial() -> &'static Testimonial {
    &DEFAULT_CARD
}
