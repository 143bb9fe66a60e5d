mod helpers;

use chime_infra::notifications::MockNotifier;
use chime_sdk::{
    APIErrorVariant, Channel, CreateReminderInput, CreateScheduleReminderInput, DSTTransitionType,
    PreviewBatchInput, RecurrenceRule, ReminderStatus, ReminderType, ValidateLocalTimeInput, ID,
};
use chrono::{Datelike, Duration, TimeZone, Utc, Weekday};
use helpers::setup::{spawn_app, spawn_app_with_notifier};

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk, _) = spawn_app().await;
    let res = sdk
        .status
        .check_health()
        .await
        .expect("Expected status to be ok");
    assert!(res.scheduler.healthy);
    assert!(res.scheduler.check_count >= 1);
}

#[actix_web::main]
#[test]
async fn test_schedule_reminder_lifecycle() {
    let (app, sdk, _) = spawn_app().await;
    let start_time = app.now + Duration::hours(2);

    let res = sdk
        .reminder
        .create_for_schedule(CreateScheduleReminderInput {
            user_id: 1,
            schedule_id: "schedule-1".into(),
            title: "Planning".into(),
            start_time,
            location: Some("Room 2".into()),
            lead_minutes: Some(30),
        })
        .await
        .expect("Expected to create schedule reminder");
    let reminder = res.reminder;
    assert_eq!(reminder.trigger_at, app.now + Duration::minutes(90));
    assert_eq!(reminder.status, ReminderStatus::Pending);
    assert_eq!(reminder.kind, ReminderType::Schedule);
    assert_eq!(reminder.message, "\"Planning\" starts in 30 minutes at Room 2");

    let res = sdk
        .reminder
        .cancel_by_target("schedule-1")
        .await
        .expect("Expected to cancel by target");
    assert_eq!(res.cancelled, 1);

    let res = sdk
        .reminder
        .get(reminder.id.clone())
        .await
        .expect("Expected to get reminder");
    assert_eq!(res.reminder.status, ReminderStatus::Cancelled);

    let res = sdk
        .reminder
        .cancel_by_target("schedule-1")
        .await
        .expect("Expected cancel by target to be idempotent");
    assert_eq!(res.cancelled, 0);
}

#[actix_web::main]
#[test]
async fn test_schedule_reminder_in_the_past_is_rejected() {
    let (app, sdk, _) = spawn_app().await;

    let err = sdk
        .reminder
        .create_for_schedule(CreateScheduleReminderInput {
            user_id: 2,
            schedule_id: "soon".into(),
            title: "Soon".into(),
            start_time: app.now + Duration::minutes(10),
            location: None,
            lead_minutes: Some(30),
        })
        .await
        .expect_err("Expected trigger in the past to be rejected");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);

    let err = sdk
        .reminder
        .create_for_schedule(CreateScheduleReminderInput {
            user_id: 2,
            schedule_id: "ancient".into(),
            title: "Ancient".into(),
            start_time: app.now + Duration::hours(2),
            location: None,
            lead_minutes: Some(i64::MAX),
        })
        .await
        .expect_err("Expected an out of range lead to be rejected");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);

    let res = sdk.reminder.get_by_user(2, None).await.unwrap();
    assert!(res.reminders.is_empty());
}

#[actix_web::main]
#[test]
async fn test_cancel_reminder() {
    let (app, sdk, _) = spawn_app().await;
    let res = sdk
        .reminder
        .create(CreateReminderInput {
            user_id: 3,
            kind: None,
            target_id: None,
            trigger_at: app.now + Duration::minutes(15),
            message: "Call mom".into(),
            channels: vec![],
            metadata: None,
        })
        .await
        .expect("Expected to create reminder");
    assert_eq!(res.reminder.kind, ReminderType::Smart);
    assert_eq!(res.reminder.channels, app.config.default_channels);

    let id = res.reminder.id;
    let res = sdk.reminder.cancel(id.clone()).await.unwrap();
    assert_eq!(res.reminder.status, ReminderStatus::Cancelled);

    let err = sdk.reminder.cancel(id).await.unwrap_err();
    assert_eq!(err.variant, APIErrorVariant::Conflict);
    assert_eq!(err.code.as_deref(), Some("conflict"));

    let err = sdk.reminder.get(ID::default()).await.unwrap_err();
    assert_eq!(err.variant, APIErrorVariant::NotFound);
}

#[actix_web::main]
#[test]
async fn test_process_due_reminders() {
    let (app, sdk, _) = spawn_app().await;

    for i in 0..3 {
        sdk.reminder
            .create(CreateReminderInput {
                user_id: 4,
                kind: Some(ReminderType::Todo),
                target_id: Some(format!("todo-{}", i)),
                trigger_at: app.now + Duration::minutes(1),
                message: format!("Todo {}", i),
                channels: vec![Channel::app()],
                metadata: None,
            })
            .await
            .expect("Expected to create reminder");
    }

    let res = sdk.reminder.process_due().await.unwrap();
    assert_eq!(res.sent, 0);

    app.sys.set(app.now + Duration::minutes(2));
    let res = sdk.reminder.process_due().await.unwrap();
    assert_eq!(res.sent, 3);
    assert_eq!(app.notifier.sent_count(), 3);

    let res = sdk
        .reminder
        .get_by_user(4, Some(ReminderStatus::Sent))
        .await
        .unwrap();
    assert_eq!(res.reminders.len(), 3);
    assert!(res.reminders.iter().all(|r| r.sent_at.is_some()));

    let res = sdk.reminder.process_due().await.unwrap();
    assert_eq!(res.sent, 0);
    assert_eq!(app.notifier.sent_count(), 3);
}

#[actix_web::main]
#[test]
async fn test_undeliverable_reminder_ends_failed() {
    let (app, sdk, _) = spawn_app_with_notifier(MockNotifier::failing()).await;

    sdk.reminder
        .create(CreateReminderInput {
            user_id: 5,
            kind: None,
            target_id: None,
            trigger_at: app.now + Duration::minutes(1),
            message: "Never arrives".into(),
            channels: vec![],
            metadata: None,
        })
        .await
        .unwrap();

    app.sys.set(app.now + Duration::minutes(2));
    let res = sdk.reminder.process_due().await.unwrap();
    assert_eq!(res.sent, 0);
    assert_eq!(app.notifier.attempts(), 3);

    let res = sdk
        .reminder
        .get_by_user(5, Some(ReminderStatus::Failed))
        .await
        .unwrap();
    assert_eq!(res.reminders.len(), 1);
    assert!(res.reminders[0].metadata.contains_key("failure_reason"));
}

#[actix_web::main]
#[test]
async fn test_invalid_status_filter() {
    let (_, _, address) = spawn_app().await;
    let res = reqwest::get(format!("{}/api/v1/user/1/reminder?status=snoozed", address))
        .await
        .expect("Expected request to reach the server");
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[actix_web::main]
#[test]
async fn test_preview_weekly_batch() {
    let (_, sdk, _) = spawn_app().await;
    let res = sdk
        .schedule
        .preview_batch(PreviewBatchInput {
            title: "Workout".into(),
            start_time: Utc.with_ymd_and_hms(2030, 1, 1, 7, 0, 0).unwrap(),
            duration: 45,
            location: None,
            recurrence: RecurrenceRule::weekly(1, vec![1, 3, 5]),
            end_date: None,
            count: 12,
            timezone: Some(chrono_tz::UTC),
        })
        .await
        .expect("Expected to preview batch");

    assert_eq!(res.total_count, 12);
    assert_eq!(res.schedules.len(), 12);
    for schedule in &res.schedules {
        assert!(matches!(
            schedule.start_time.weekday(),
            Weekday::Mon | Weekday::Wed | Weekday::Fri
        ));
        assert_eq!(schedule.end_time - schedule.start_time, Duration::minutes(45));
    }
    assert!(res
        .schedules
        .windows(2)
        .all(|w| w[0].start_time < w[1].start_time));
}

#[actix_web::main]
#[test]
async fn test_preview_with_huge_interval_returns_first_instance() {
    let (_, sdk, _) = spawn_app().await;
    let start_time = Utc.with_ymd_and_hms(2030, 1, 7, 7, 0, 0).unwrap();
    for recurrence in [
        RecurrenceRule::daily(100_000_000),
        RecurrenceRule::weekly(100_000_000, vec![1]),
    ] {
        let res = sdk
            .schedule
            .preview_batch(PreviewBatchInput {
                title: "Rare".into(),
                start_time,
                duration: 30,
                location: None,
                recurrence,
                end_date: None,
                count: 5,
                timezone: Some(chrono_tz::UTC),
            })
            .await
            .expect("Expected the preview to succeed");
        assert_eq!(res.total_count, 1);
        assert_eq!(res.schedules[0].start_time, start_time);
    }
}

#[actix_web::main]
#[test]
async fn test_timezone_diagnostics() {
    let (_, sdk, _) = spawn_app().await;

    let res = sdk
        .timezone
        .validate_local_time(ValidateLocalTimeInput {
            timezone: chrono_tz::America::New_York,
            year: 2024,
            month: 3,
            day: 10,
            hour: 2,
            minute: 30,
        })
        .await
        .expect("Expected to validate local time");
    assert!(res.is_valid);
    assert!(!res.warnings.is_empty());
    assert_eq!(res.valid_time, Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap());

    let err = sdk
        .timezone
        .validate_local_time(ValidateLocalTimeInput {
            timezone: chrono_tz::UTC,
            year: 2024,
            month: 2,
            day: 30,
            hour: 9,
            minute: 0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.variant, APIErrorVariant::BadClientData);

    let res = sdk
        .timezone
        .dst_transitions(
            chrono_tz::Europe::Berlin,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().timestamp(),
        )
        .await
        .expect("Expected to list transitions");
    assert_eq!(res.transitions.len(), 2);
    assert_eq!(res.transitions[0].kind, DSTTransitionType::SpringForward);
    assert_eq!(res.transitions[0].to_offset - res.transitions[0].from_offset, 3600);
    assert_eq!(res.transitions[1].kind, DSTTransitionType::FallBack);
}
