//! Effective data of each widget, recomputed on every render from the
//! three sources.

use super::record::{EducationEntry, ServiceItem, Testimonial};
use crate::sync::resolve::{DataSource, Resolved, Sources};

#[derive(Debug, Clone, PartialEq)]
pub struct AboutEffective {
    pub about_text: Resolved<String>,
    pub education: Resolved<Vec<EducationEntry>>,
    pub hospitals: Resolved<Vec<String>>,
    pub certificates: Resolved<Vec<String>>,
    pub languages: Resolved<Vec<String>>,
}

impl AboutEffective {
    pub fn resolve(sources: &Sources<'_>) -> Self {
        Self {
            about_text: sources.value(|r| r.about_text.as_ref()),
            education: sources.value(|r| r.education.as_ref()),
            hospitals: sources.value(|r| r.hospitals.as_ref()),
            certificates: sources.value(|r| r.certificates.as_ref()),
            languages: sources.value(|r| r.languages.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummaryEffective {
    pub doctor_name: Resolved<String>,
    pub specialty: Resolved<String>,
    pub patients: Resolved<String>,
    pub experience: Resolved<String>,
    pub rating: Resolved<String>,
    pub image_src: Resolved<String>,
}

impl ProfileSummaryEffective {
    pub fn resolve(sources: &Sources<'_>) -> Self {
        Self {
            doctor_name: sources.value(|r| r.doctor_name.as_ref()),
            specialty: sources.value(|r| r.specialty.as_ref()),
            patients: sources.value(|r| r.patients.as_ref()),
            experience: sources.value(|r| r.experience.as_ref()),
            rating: sources.value(|r| r.rating.as_ref()),
            image_src: sources.value(|r| r.image_src.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselEffective {
    /// The whole list from the first source that has one. Slides are its
    /// entries; an empty list gives no slides.
    pub testimonials: Resolved<Vec<Testimonial>>,
    pub overall_rating: Resolved<f32>,
    pub total_reviews: Resolved<u32>,
    pub recommended_rate: Resolved<u32>,
}

impl CarouselEffective {
    pub fn resolve(sources: &Sources<'_>) -> Self {
        Self {
            testimonials: sources.value(|r| r.testimonials.as_ref()),
            overall_rating: sources.value(|r| r.overall_rating.as_ref()),
            total_reviews: sources.value(|r| r.total_reviews.as_ref()),
            recommended_rate: sources.value(|r| r.recommended_rate.as_ref()),
        }
    }

    pub fn len(&self) -> usize {
        self.testimonials.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.testimonials.value.is_empty()
    }

    pub fn slide(&self, index: usize) -> Option<Resolved<&Testimonial>> {
        self.testimonials
            .value
            .get(index)
            .map(|t| Resolved::new(t, self.testimonials.source))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServicesEffective {
    pub services: Resolved<Vec<ServiceItem>>,
    pub conditions: Resolved<Vec<String>>,
}

impl ServicesEffective {
    pub fn resolve(sources: &Sources<'_>) -> Self {
        Self {
            services: sources.value(|r| r.services.as_ref()),
            conditions: sources.value(|r| r.conditions.as_ref()),
        }
    }
}

/// Summary of where a widget's data came from, for the diagnostics panel.
pub fn overall_source(sources: &[DataSource]) -> DataSource {
    if sources.contains(&DataSource::Shared) {
        DataSource::Shared
    } else if sources.contains(&DataSource::Explicit) {
        DataSource::Explicit
    } else {
        DataSource::Default
    }
}
