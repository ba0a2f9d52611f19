use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Careers a bootcamp can teach. Anything else is rejected on create/update.
pub const ALLOWED_CAREERS: &[&str] = &[
    "Web Development",
    "Mobile Development",
    "UI/UX",
    "Data Science",
    "Business",
    "Other",
];

/// Geocoded address of a bootcamp.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Location {
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Bootcamp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location: Location,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_rating: Option<f64>,
    pub average_cost: Option<i32>,
    pub photo: String,
    pub created_at: DateTime<Utc>,
}

/// URL-friendly form of a bootcamp name: lowercase, runs of
/// non-alphanumeric characters collapsed to a single hyphen.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

pub fn validate_careers(careers: &[String]) -> Result<(), String> {
    for c in careers {
        if !ALLOWED_CAREERS.contains(&c.as_str()) {
            return Err(format!("Invalid career: {c}"));
        }
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Please add a name".into());
    }
    if name.len() > 50 {
        return Err("Name can not be more than 50 characters".into());
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Please add a description".into());
    }
    if description.len() > 500 {
        return Err("Description can not be more than 500 characters".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
        assert_eq!(slugify("ModernTech  Bootcamp!"), "moderntech-bootcamp");
        assert_eq!(slugify("  UI/UX Pro  "), "ui-ux-pro");
    }

    #[test]
    fn careers_must_come_from_allowed_list() {
        let ok = vec!["Web Development".to_string(), "UI/UX".to_string()];
        assert!(validate_careers(&ok).is_ok());
        let bad = vec!["Underwater Basket Weaving".to_string()];
        assert!(validate_careers(&bad).is_err());
    }

    #[test]
    fn name_and_description_limits() {
        assert!(validate_name("Devworks").is_ok());
        assert!(validate_name(&"x".repeat(51)).is_err());
        assert!(validate_description(&"x".repeat(500)).is_ok());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }
}
