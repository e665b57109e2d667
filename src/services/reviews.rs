use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::errors::PortalError;
use crate::models::{NewReview, Review, ReviewPatch, MIN_REVIEW_LEN};
use crate::store::{RecordStore, REVIEWS_KEY};

/// Reviews, newest first (new entries are prepended).
pub fn list_reviews(store: &RecordStore) -> Vec<Review> {
    store.load(REVIEWS_KEY, vec![])
}

pub fn create_review(
    store: &RecordStore,
    payload: NewReview,
    now: NaiveDateTime,
) -> Result<Review, PortalError> {
    let text = validate_text(&payload.text)?;
    validate_rating(payload.rating)?;

    let review = Review {
        id: Uuid::new_v4().to_string(),
        user_id: payload.user_id,
        user_name: payload.user_name.trim().to_string(),
        car: payload.car.trim().to_string(),
        rating: payload.rating,
        text,
        created_at: now,
    };

    let mut reviews = list_reviews(store);
    reviews.insert(0, review.clone());
    store.save(REVIEWS_KEY, &reviews)?;
    Ok(review)
}

pub fn update_review(
    store: &RecordStore,
    id: &str,
    patch: ReviewPatch,
) -> Result<Review, PortalError> {
    let mut reviews = list_reviews(store);
    let review = reviews
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| PortalError::NotFound(format!("review {id}")))?;

    if let Some(text) = patch.text {
        review.text = validate_text(&text)?;
    }
    if let Some(rating) = patch.rating {
        validate_rating(rating)?;
        review.rating = rating;
    }
    if let Some(car) = patch.car {
        review.car = car.trim().to_string();
    }

    let updated = review.clone();
    store.save(REVIEWS_KEY, &reviews)?;
    Ok(updated)
}

pub fn delete_review(store: &RecordStore, id: &str) -> Result<bool, PortalError> {
    let mut reviews = list_reviews(store);
    let before = reviews.len();
    reviews.retain(|r| r.id != id);
    if reviews.len() == before {
        return Ok(false);
    }
    store.save(REVIEWS_KEY, &reviews)?;
    Ok(true)
}

fn validate_text(text: &str) -> Result<String, PortalError> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_REVIEW_LEN {
        return Err(PortalError::Validation(format!(
            "review text must be at least {MIN_REVIEW_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_rating(rating: u8) -> Result<(), PortalError> {
    if !(1..=5).contains(&rating) {
        return Err(PortalError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}
