//! Subscription service tests against the in-memory mock repository

mod common;

use std::sync::Arc;

use common::MockSubscriptionRepository;
use subtrack_core::{CoreError, SubscriptionService, TotalCost};
use subtrack_types::{
    CreateSubscriptionInput, Period, SubscriptionId, TotalCostInput, UpdateSubscriptionInput,
    UserId, ValidationError,
};

fn service() -> (SubscriptionService, MockSubscriptionRepository) {
    let repo = MockSubscriptionRepository::new();
    (SubscriptionService::new(Arc::new(repo.clone())), repo)
}

fn create_input(service_name: &str, user_id: UserId) -> CreateSubscriptionInput {
    CreateSubscriptionInput {
        service_name: service_name.to_string(),
        price: 400,
        user_id: user_id.to_string(),
        start_date: "01-2026".to_string(),
        end_date: None,
    }
}

#[tokio::test]
async fn test_create_defaults_end_and_reads_back() {
    let (service, _) = service();
    let user = UserId::new();

    let id = service.create(&create_input("Yandex", user)).await.unwrap();
    let sub = service.get(id).await.unwrap();

    assert_eq!(sub.service_name, "Yandex");
    assert_eq!(sub.price, 400);
    assert_eq!(sub.user_id, user);
    assert_eq!(sub.start, Period::new(1, 2026));
    assert_eq!(sub.end, Period::new(2, 2026));
}

#[tokio::test]
async fn test_invalid_input_never_reaches_storage() {
    let (service, repo) = service();
    let input = CreateSubscriptionInput {
        price: -10,
        ..create_input("Yandex", UserId::new())
    };

    let err = service.create(&input).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::InvalidPrice)
    ));
    assert_eq!(repo.count(), 0);
}

#[tokio::test]
async fn test_duplicate_create_is_already_exists() {
    let (service, _) = service();
    let user = UserId::new();

    service.create(&create_input("Yandex", user)).await.unwrap();
    let err = service.create(&create_input("Yandex", user)).await.unwrap_err();
    assert!(matches!(err, CoreError::AlreadyExists));
}

#[tokio::test]
async fn test_update_start_past_end_hits_constraint() {
    let (service, _) = service();
    let id = service
        .create(&create_input("Yandex", UserId::new()))
        .await
        .unwrap();

    let input = UpdateSubscriptionInput {
        start_date: Some("06-2026".to_string()),
        ..Default::default()
    };
    let err = service.update(id, &input).await.unwrap_err();
    assert!(matches!(err, CoreError::ConstraintViolation(_)));
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let (service, _) = service();
    let input = UpdateSubscriptionInput {
        price: Some(1),
        ..Default::default()
    };
    let err = service.update(SubscriptionId(42), &input).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_twice() {
    let (service, _) = service();
    let id = service
        .create(&create_input("Yandex", UserId::new()))
        .await
        .unwrap();

    service.delete(id).await.unwrap();
    assert!(service.delete(id).await.unwrap_err().is_not_found());
    assert!(service.get(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_list_pairing_rule() {
    let (service, _) = service();
    for name in ["A", "B", "C"] {
        service
            .create(&create_input(name, UserId::new()))
            .await
            .unwrap();
    }

    assert_eq!(service.list(None, None).await.unwrap().len(), 3);
    assert_eq!(service.list(Some(2), Some(2)).await.unwrap().len(), 1);
    assert!(matches!(
        service.list(Some(5), None).await,
        Err(CoreError::Validation(ValidationError::MissingOffset))
    ));
    assert!(matches!(
        service.list(None, Some(5)).await,
        Err(CoreError::Validation(ValidationError::MissingLimit))
    ));
}

#[tokio::test]
async fn test_total_cost_filters_by_user() {
    let (service, _) = service();
    let users: Vec<UserId> = (0..5).map(|_| UserId::new()).collect();

    for (i, user) in users.iter().enumerate() {
        let input = CreateSubscriptionInput {
            service_name: format!("Service{i}"),
            price: 100 * (i as i64 + 1),
            user_id: user.to_string(),
            start_date: "03-2025".to_string(),
            end_date: Some("06-2025".to_string()),
        };
        service.create(&input).await.unwrap();
    }

    let window = TotalCostInput {
        start_date: Some("01-2025".to_string()),
        end_date: Some("12-2025".to_string()),
        ..Default::default()
    };

    // 3 months each at 100..=500
    let all = service.total_cost(&window).await.unwrap();
    assert_eq!(all, TotalCost { total: 4500, count: 5 });

    let one = TotalCostInput {
        user_id: Some(users[3].to_string()),
        ..window.clone()
    };
    assert_eq!(
        service.total_cost(&one).await.unwrap(),
        TotalCost { total: 1200, count: 1 }
    );

    let by_service = TotalCostInput {
        service_name: Some("Service0".to_string()),
        ..window
    };
    assert_eq!(service.total_cost(&by_service).await.unwrap().total, 300);
}

#[tokio::test]
async fn test_total_cost_excludes_boundary_subscriptions() {
    let (service, _) = service();
    let input = CreateSubscriptionInput {
        start_date: "01-2025".to_string(),
        end_date: Some("06-2025".to_string()),
        ..create_input("Yandex", UserId::new())
    };
    service.create(&input).await.unwrap();

    let window = TotalCostInput {
        start_date: Some("01-2025".to_string()),
        end_date: Some("12-2025".to_string()),
        ..Default::default()
    };
    assert_eq!(service.total_cost(&window).await.unwrap().count, 0);
}

#[tokio::test]
async fn test_total_cost_validation() {
    let (service, _) = service();
    let reversed = TotalCostInput {
        start_date: Some("12-2025".to_string()),
        end_date: Some("01-2025".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.total_cost(&reversed).await,
        Err(CoreError::Validation(ValidationError::StartAfterEnd))
    ));
}
