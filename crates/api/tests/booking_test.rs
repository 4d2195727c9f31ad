mod test_utils;

use mockall::predicate;
use uuid::Uuid;

use gymfinder_api::middleware::error_handling::AppError;
use gymfinder_core::errors::GymError;
use gymfinder_core::models::booking::BookingStatus;
use gymfinder_db::models::DbBooking;
use gymfinder_db::repositories::booking::StatusUpdate;

use test_utils::{TestContext, sample_booking, sample_gym, sample_user};
use gymfinder_core::models::user::UserRole;

// Wrappers that replay the handler flow against the mocked repositories,
// mirroring how the real handlers orchestrate the calls.

async fn test_create_booking_wrapper(
    ctx: &mut TestContext,
    user_id: Uuid,
    gym_id: Uuid,
) -> Result<DbBooking, AppError> {
    let gym = ctx.gym_repo.get_gym_by_id(gym_id).await?;
    if gym.is_none() {
        return Err(AppError(GymError::NotFound(format!(
            "Gym with ID {} not found",
            gym_id
        ))));
    }

    if ctx.booking_repo.has_active_booking(user_id, gym_id).await? {
        return Err(AppError(GymError::Conflict(
            "You already have an active booking for this gym".to_string(),
        )));
    }

    let booking = ctx
        .booking_repo
        .create_booking(user_id, gym_id, None, None, None)
        .await?;

    Ok(booking)
}

async fn test_update_status_wrapper(
    ctx: &mut TestContext,
    actor_id: Uuid,
    actor_is_admin: bool,
    booking_id: Uuid,
    raw_status: &str,
) -> Result<DbBooking, AppError> {
    let new_status: BookingStatus = raw_status.parse().map_err(AppError)?;

    let booking = ctx
        .booking_repo
        .get_booking_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError(GymError::NotFound("Booking not found".to_string())))?;

    let gym = ctx
        .gym_repo
        .get_gym_by_id(booking.gym_id)
        .await?
        .ok_or_else(|| AppError(GymError::NotFound("Gym not found".to_string())))?;

    if gym.owner_id != actor_id && !actor_is_admin {
        return Err(AppError(GymError::Authorization(
            "Not authorized to decide this booking".to_string(),
        )));
    }

    match ctx
        .booking_repo
        .update_booking_status(booking_id, new_status)
        .await?
    {
        StatusUpdate::Applied(updated) => Ok(updated),
        StatusUpdate::NotPending => Err(AppError(GymError::InvalidState(
            "Booking has already been decided".to_string(),
        ))),
    }
}

#[tokio::test]
async fn test_create_booking_succeeds_without_active_booking() {
    let mut ctx = TestContext::new();
    let user = sample_user(UserRole::Customer);
    let owner = sample_user(UserRole::GymOwner);
    let gym = sample_gym(owner.id);
    let gym_id = gym.id;
    let user_id = user.id;

    ctx.gym_repo
        .expect_get_gym_by_id()
        .with(predicate::eq(gym_id))
        .times(1)
        .returning(move |_| Ok(Some(gym.clone())));

    ctx.booking_repo
        .expect_has_active_booking()
        .with(predicate::eq(user_id), predicate::eq(gym_id))
        .times(1)
        .returning(|_, _| Ok(false));

    ctx.booking_repo
        .expect_create_booking()
        .times(1)
        .returning(move |user_id, gym_id, _, _, _| Ok(sample_booking(user_id, gym_id, "pending")));

    let booking = test_create_booking_wrapper(&mut ctx, user_id, gym_id)
        .await
        .expect("booking should be created");

    assert_eq!(booking.status, "pending");
    assert!(booking.responded_at.is_none());
}

#[tokio::test]
async fn test_second_create_fails_with_conflict() {
    let mut ctx = TestContext::new();
    let user = sample_user(UserRole::Customer);
    let owner = sample_user(UserRole::GymOwner);
    let gym = sample_gym(owner.id);
    let gym_id = gym.id;

    ctx.gym_repo
        .expect_get_gym_by_id()
        .times(1)
        .returning(move |_| Ok(Some(gym.clone())));

    // An earlier booking is still pending or confirmed
    ctx.booking_repo
        .expect_has_active_booking()
        .times(1)
        .returning(|_, _| Ok(true));

    // No insert may happen on the conflict path
    ctx.booking_repo.expect_create_booking().times(0);

    let result = test_create_booking_wrapper(&mut ctx, user.id, gym_id).await;

    match result {
        Err(AppError(GymError::Conflict(_))) => {}
        other => panic!("Expected Conflict, got {:?}", other.map(|b| b.id)),
    }
}

#[tokio::test]
async fn test_confirm_by_stranger_is_forbidden_and_touches_nothing() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);
    let stranger = sample_user(UserRole::Customer);
    let customer = sample_user(UserRole::Customer);
    let gym = sample_gym(owner.id);
    let booking = sample_booking(customer.id, gym.id, "pending");
    let booking_id = booking.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .times(1)
        .returning(move |_| Ok(Some(booking.clone())));

    ctx.gym_repo
        .expect_get_gym_by_id()
        .times(1)
        .returning(move |_| Ok(Some(gym.clone())));

    // The decision write must never run for an unauthorized actor
    ctx.booking_repo.expect_update_booking_status().times(0);

    let result =
        test_update_status_wrapper(&mut ctx, stranger.id, false, booking_id, "confirmed").await;

    match result {
        Err(AppError(GymError::Authorization(_))) => {}
        other => panic!("Expected Forbidden, got {:?}", other.map(|b| b.id)),
    }
}

#[tokio::test]
async fn test_owner_confirms_pending_booking() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);
    let customer = sample_user(UserRole::Customer);
    let gym = sample_gym(owner.id);
    let booking = sample_booking(customer.id, gym.id, "pending");
    let booking_id = booking.id;
    let owner_id = owner.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .times(1)
        .returning(move |_| Ok(Some(booking.clone())));

    ctx.gym_repo
        .expect_get_gym_by_id()
        .times(1)
        .returning(move |_| Ok(Some(gym.clone())));

    ctx.booking_repo
        .expect_update_booking_status()
        .with(
            predicate::eq(booking_id),
            predicate::eq(BookingStatus::Confirmed),
        )
        .times(1)
        .returning(move |id, _| {
            let mut decided = sample_booking(Uuid::new_v4(), Uuid::new_v4(), "confirmed");
            decided.id = id;
            Ok(StatusUpdate::Applied(decided))
        });

    let decided =
        test_update_status_wrapper(&mut ctx, owner_id, false, booking_id, "confirmed")
            .await
            .expect("owner decision should apply");

    assert_eq!(decided.status, "confirmed");
    assert!(decided.responded_at.is_some());
}

#[tokio::test]
async fn test_deciding_a_decided_booking_is_invalid_state() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);
    let customer = sample_user(UserRole::Customer);
    let gym = sample_gym(owner.id);
    let booking = sample_booking(customer.id, gym.id, "confirmed");
    let booking_id = booking.id;
    let owner_id = owner.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .times(1)
        .returning(move |_| Ok(Some(booking.clone())));

    ctx.gym_repo
        .expect_get_gym_by_id()
        .times(1)
        .returning(move |_| Ok(Some(gym.clone())));

    // Confirmed is terminal; the conditional write matches no row
    ctx.booking_repo
        .expect_update_booking_status()
        .times(1)
        .returning(|_, _| Ok(StatusUpdate::NotPending));

    let result =
        test_update_status_wrapper(&mut ctx, owner_id, false, booking_id, "rejected").await;

    match result {
        Err(AppError(GymError::InvalidState(_))) => {}
        other => panic!("Expected InvalidState, got {:?}", other.map(|b| b.id)),
    }
}

#[tokio::test]
async fn test_unknown_status_value_is_rejected_before_any_lookup() {
    let mut ctx = TestContext::new();
    let owner = sample_user(UserRole::GymOwner);

    // Nothing may be read or written for a malformed status
    ctx.booking_repo.expect_get_booking_by_id().times(0);
    ctx.booking_repo.expect_update_booking_status().times(0);

    let result =
        test_update_status_wrapper(&mut ctx, owner.id, false, Uuid::new_v4(), "canceled").await;

    match result {
        Err(AppError(GymError::Validation(_))) => {}
        other => panic!("Expected Validation, got {:?}", other.map(|b| b.id)),
    }
}

async fn test_update_booking_wrapper(
    ctx: &mut TestContext,
    actor_id: Uuid,
    booking_id: Uuid,
    note: &'static str,
) -> Result<DbBooking, AppError> {
    let booking = ctx
        .booking_repo
        .get_booking_by_id(booking_id)
        .await?
        .ok_or_else(|| AppError(GymError::NotFound("Booking not found".to_string())))?;

    if booking.user_id != actor_id {
        return Err(AppError(GymError::Authorization(
            "Not authorized to update this booking".to_string(),
        )));
    }

    let status: BookingStatus = booking.status.parse().map_err(AppError)?;
    if status.is_terminal() {
        return Err(AppError(GymError::InvalidState(
            "Cannot modify a booking that has already been decided".to_string(),
        )));
    }

    let updated = ctx
        .booking_repo
        .update_booking(booking_id, None, None, Some(note))
        .await?;

    Ok(updated)
}

#[tokio::test]
async fn test_requester_edits_pending_booking() {
    let mut ctx = TestContext::new();
    let customer = sample_user(UserRole::Customer);
    let booking = sample_booking(customer.id, Uuid::new_v4(), "pending");
    let booking_id = booking.id;
    let customer_id = customer.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .times(1)
        .returning(move |_| Ok(Some(booking.clone())));

    ctx.booking_repo
        .expect_update_booking()
        .times(1)
        .returning(move |id, _, _, note| {
            let mut updated = sample_booking(customer_id, Uuid::new_v4(), "pending");
            updated.id = id;
            updated.note = note.map(str::to_string);
            Ok(updated)
        });

    let updated = test_update_booking_wrapper(&mut ctx, customer_id, booking_id, "Evenings now")
        .await
        .expect("pending booking should be editable");

    assert_eq!(updated.note.as_deref(), Some("Evenings now"));
}

#[tokio::test]
async fn test_editing_a_confirmed_booking_is_invalid_state() {
    let mut ctx = TestContext::new();
    let customer = sample_user(UserRole::Customer);
    let booking = sample_booking(customer.id, Uuid::new_v4(), "confirmed");
    let booking_id = booking.id;
    let customer_id = customer.id;

    ctx.booking_repo
        .expect_get_booking_by_id()
        .times(1)
        .returning(move |_| Ok(Some(booking.clone())));

    // Decided bookings are immutable; no write may run
    ctx.booking_repo.expect_update_booking().times(0);

    let result =
        test_update_booking_wrapper(&mut ctx, customer_id, booking_id, "Too late").await;

    match result {
        Err(AppError(GymError::InvalidState(_))) => {}
        other => panic!("Expected InvalidState, got {:?}", other.map(|b| b.id)),
    }
}

#[tokio::test]
async fn test_delete_keeps_counter_untouched() {
    let mut ctx = TestContext::new();
    let customer = sample_user(UserRole::Customer);
    let booking = sample_booking(customer.id, Uuid::new_v4(), "confirmed");
    let booking_id = booking.id;

    ctx.booking_repo
        .expect_delete_booking()
        .with(predicate::eq(booking_id))
        .times(1)
        .returning(|_| Ok(()));

    // Deletion never reconciles eagerly; the next listing read does
    ctx.gym_repo.expect_reconcile_subscriber_count().times(0);

    ctx.booking_repo
        .delete_booking(booking_id)
        .await
        .expect("delete should succeed");
}
