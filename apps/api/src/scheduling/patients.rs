//! Owners and their pets: the records an appointment is booked against.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::scheduling::validation::{
    email_shape, optional_text, pet_age, require_text, BREED_MAX_CHARS, NOTES_MAX_CHARS,
    PERSON_NAME_MAX_CHARS, PET_NAME_MAX_CHARS, PHONE_MAX_CHARS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl OwnerInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name, PERSON_NAME_MAX_CHARS)?;
        if let Some(email) = &self.email {
            email_shape("email", email)?;
        }
        optional_text("phone", self.phone.as_deref(), PHONE_MAX_CHARS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PetInput {
    pub owner_id: i32,
    pub species_id: i32,
    pub name: String,
    pub breed: Option<String>,
    pub age_years: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub allergy_ids: Vec<i32>,
}

impl PetInput {
    pub fn validate(&self) -> Result<(), AppError> {
        require_text("name", &self.name, PET_NAME_MAX_CHARS)?;
        optional_text("breed", self.breed.as_deref(), BREED_MAX_CHARS)?;
        if let Some(age) = self.age_years {
            pet_age(age)?;
        }
        optional_text("notes", self.notes.as_deref(), NOTES_MAX_CHARS)?;
        Ok(())
    }

    /// Allergy ids without repeats, first occurrence kept.
    fn distinct_allergies(&self) -> Vec<i32> {
        let mut ids = Vec::with_capacity(self.allergy_ids.len());
        for id in &self.allergy_ids {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }
}

pub async fn create_owner(pool: &PgPool, input: &OwnerInput) -> Result<i32, AppError> {
    input.validate()?;

    let id: i32 = sqlx::query_scalar(
        "INSERT INTO owners (name, email, phone) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(input.name.trim())
    .bind(input.email.as_deref().map(str::trim))
    .bind(input.phone.as_deref().map(str::trim))
    .fetch_one(pool)
    .await?;

    info!("Created owner {id}");
    Ok(id)
}

/// Inserts the pet and its allergy links in one transaction.
pub async fn create_pet(pool: &PgPool, input: &PetInput) -> Result<i32, AppError> {
    input.validate()?;
    let allergies = input.distinct_allergies();

    let mut tx = pool.begin().await?;

    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO pets (owner_id, species_id, name, breed, age_years, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(input.owner_id)
    .bind(input.species_id)
    .bind(input.name.trim())
    .bind(input.breed.as_deref())
    .bind(input.age_years)
    .bind(input.notes.as_deref())
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::from_write(e, "owner_id or species_id"))?;

    for allergy_id in allergies.iter().copied() {
        sqlx::query("INSERT INTO pet_allergies (pet_id, allergy_id) VALUES ($1, $2)")
            .bind(id)
            .bind(allergy_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_write(e, "allergy_ids"))?;
    }

    tx.commit().await?;

    info!(
        "Created pet {id} for owner {} with {} allergies",
        input.owner_id,
        allergies.len()
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pet(body: serde_json::Value) -> PetInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_owner_validation() {
        let ok = OwnerInput {
            name: "Ana López".to_string(),
            email: Some("ana@example.mx".to_string()),
            phone: Some("555-0100".to_string()),
        };
        assert!(ok.validate().is_ok());

        let no_contact = OwnerInput {
            email: None,
            phone: None,
            ..ok.clone()
        };
        assert!(no_contact.validate().is_ok());

        let blank_name = OwnerInput {
            name: "  ".to_string(),
            ..ok.clone()
        };
        assert!(blank_name.validate().is_err());

        let bad_email = OwnerInput {
            email: Some("ana.example.mx".to_string()),
            ..ok.clone()
        };
        assert!(bad_email.validate().is_err());

        let long_phone = OwnerInput {
            phone: Some("5".repeat(21)),
            ..ok
        };
        assert!(long_phone.validate().is_err());
    }

    #[test]
    fn test_pet_defaults_and_validation() {
        let p = pet(json!({ "owner_id": 1, "species_id": 2, "name": "Firulais" }));
        assert!(p.validate().is_ok());
        assert!(p.allergy_ids.is_empty());
        assert!(p.age_years.is_none());

        let old = pet(json!({ "owner_id": 1, "species_id": 2, "name": "Michi", "age_years": 61 }));
        assert!(old.validate().is_err());

        let unnamed = pet(json!({ "owner_id": 1, "species_id": 2, "name": "" }));
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_repeated_allergies_collapse() {
        let p = pet(json!({
            "owner_id": 1,
            "species_id": 2,
            "name": "Firulais",
            "allergy_ids": [3, 1, 3, 2, 1]
        }));
        assert_eq!(p.distinct_allergies(), vec![3, 1, 2]);
    }
}
