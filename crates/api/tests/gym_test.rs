mod test_utils;

use mockall::predicate;
use uuid::Uuid;

use gymfinder_api::middleware::error_handling::AppError;
use gymfinder_core::models::gym::{RatingsResponse, round_rating};
use gymfinder_core::models::user::UserRole;
use gymfinder_db::models::DbGymListing;

use test_utils::{TestContext, sample_gym, sample_listing, sample_user};

// Replays the listing flow: fetch rows with live aggregates, then rewrite
// any cached subscriber count that disagrees with the confirmed count.
async fn test_list_gyms_wrapper(ctx: &mut TestContext) -> Result<Vec<DbGymListing>, AppError> {
    let mut listings = ctx.gym_repo.list_gyms().await?;

    for listing in listings.iter_mut() {
        if listing.subscriber_count != listing.confirmed_count {
            listing.subscriber_count = ctx.gym_repo.reconcile_subscriber_count(listing.id).await?;
        }
    }

    Ok(listings)
}

#[tokio::test]
async fn test_listing_heals_drifted_counter() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);
    let gym = sample_gym(owner.id);
    let gym_id = gym.id;

    // Cached value drifted to 5 while 7 bookings are actually confirmed
    let drifted = sample_listing(&gym, 5, 7);

    ctx.gym_repo
        .expect_list_gyms()
        .times(1)
        .returning(move || Ok(vec![drifted.clone()]));

    ctx.gym_repo
        .expect_reconcile_subscriber_count()
        .with(predicate::eq(gym_id))
        .times(1)
        .returning(|_| Ok(7));

    let listings = test_list_gyms_wrapper(&mut ctx)
        .await
        .expect("listing should succeed");

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].subscriber_count, 7);
    assert_eq!(listings[0].confirmed_count, 7);
}

#[tokio::test]
async fn test_listing_leaves_consistent_counter_alone() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);
    let gym = sample_gym(owner.id);

    let consistent = sample_listing(&gym, 3, 3);

    ctx.gym_repo
        .expect_list_gyms()
        .times(1)
        .returning(move || Ok(vec![consistent.clone()]));

    // No write-back when the cache already matches
    ctx.gym_repo.expect_reconcile_subscriber_count().times(0);

    let listings = test_list_gyms_wrapper(&mut ctx)
        .await
        .expect("listing should succeed");

    assert_eq!(listings[0].subscriber_count, 3);
}

#[tokio::test]
async fn test_drift_in_either_direction_is_healed() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);
    let gym_low = sample_gym(owner.id);
    let gym_high = sample_gym(owner.id);

    // One cache behind the truth, one ahead of it (confirmed booking deleted)
    let behind = sample_listing(&gym_low, 1, 4);
    let ahead = sample_listing(&gym_high, 9, 2);

    ctx.gym_repo
        .expect_list_gyms()
        .times(1)
        .returning(move || Ok(vec![behind.clone(), ahead.clone()]));

    ctx.gym_repo
        .expect_reconcile_subscriber_count()
        .with(predicate::eq(gym_low.id))
        .times(1)
        .returning(|_| Ok(4));

    ctx.gym_repo
        .expect_reconcile_subscriber_count()
        .with(predicate::eq(gym_high.id))
        .times(1)
        .returning(|_| Ok(2));

    let listings = test_list_gyms_wrapper(&mut ctx)
        .await
        .expect("listing should succeed");

    assert_eq!(listings[0].subscriber_count, 4);
    assert_eq!(listings[1].subscriber_count, 2);
}

#[tokio::test]
async fn test_ratings_are_rounded_to_one_decimal() {
    let mut ctx = TestContext::new();
    let gym_id = Uuid::new_v4();

    ctx.gym_repo
        .expect_get_gym_ratings()
        .with(predicate::eq(gym_id))
        .times(1)
        .returning(|_| {
            Ok(gymfinder_db::models::DbGymRatings {
                average_rating: 4.2666,
                review_count: 15,
            })
        });

    let raw = ctx.gym_repo.get_gym_ratings(gym_id).await.unwrap();
    let ratings = RatingsResponse::from_parts(raw.average_rating, raw.review_count);

    assert_eq!(ratings.average_rating, 4.3);
    assert_eq!(ratings.review_count, 15);
}

#[tokio::test]
async fn test_unreviewed_gym_reports_zero() {
    let ratings = RatingsResponse::from_parts(0.0, 0);
    assert_eq!(ratings.average_rating, 0.0);
    assert_eq!(ratings.review_count, 0);
}

#[test]
fn test_round_rating_is_stable_on_exact_values() {
    assert_eq!(round_rating(4.0), 4.0);
    assert_eq!(round_rating(4.5), 4.5);
}
