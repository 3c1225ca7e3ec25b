use chrono::Utc;
use shared::{AcceptanceLog, AcceptanceLogListResponse, Child, LogMealRequest};
use tracing::info;

use crate::domain::recipe_catalog::find_recipe;
use crate::error::{AppError, AppResult};
use crate::storage::{generate_id, Collection, RecordStore};

/// Service for recording how much of a served meal a child ate
#[derive(Clone)]
pub struct AcceptanceService {
    store: RecordStore,
}

impl AcceptanceService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Append a meal observation. The recipe name is copied onto the log so
    /// reports keep working for recipes that are not in the catalog.
    pub async fn log_meal(&self, request: LogMealRequest) -> AppResult<AcceptanceLog> {
        info!(
            "Logging meal: child={}, recipe={}, status={:?}, meal={:?}",
            request.child_id, request.recipe_id, request.status, request.meal_type
        );

        let children: Vec<Child> = self.store.get_all(Collection::Children).await;
        if !children.iter().any(|c| c.id == request.child_id) {
            return Err(AppError::NotFound(format!("Child {}", request.child_id)));
        }

        let recipe_name = match request.recipe_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => find_recipe(&request.recipe_id)
                .map(|r| r.name.clone())
                .ok_or_else(|| {
                    AppError::InvalidInput(format!(
                        "recipe_name is required for recipe {} which is not in the catalog",
                        request.recipe_id
                    ))
                })?,
        };

        let log = AcceptanceLog {
            id: generate_id(),
            child_id: request.child_id,
            recipe_id: request.recipe_id,
            recipe_name,
            date: Utc::now().to_rfc3339(),
            status: request.status,
            meal_type: request.meal_type,
        };

        self.store.append(Collection::AcceptanceLogs, log.clone()).await?;
        Ok(log)
    }

    pub async fn list_logs(&self) -> AcceptanceLogListResponse {
        let logs: Vec<AcceptanceLog> = self.store.get_all(Collection::AcceptanceLogs).await;
        AcceptanceLogListResponse { logs }
    }

    pub async fn logs_for_child(&self, child_id: &str) -> AcceptanceLogListResponse {
        let logs: Vec<AcceptanceLog> = self.store.get_all(Collection::AcceptanceLogs).await;
        AcceptanceLogListResponse {
            logs: logs.into_iter().filter(|l| l.child_id == child_id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::child_service::ChildService;
    use crate::storage::DbConnection;
    use shared::{AcceptanceStatus, CreateChildRequest, Gender, MealType};
    use std::sync::Arc;

    async fn setup_test() -> (AcceptanceService, String) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let store = RecordStore::new(Arc::new(db));
        let child = ChildService::new(store.clone())
            .register_child(CreateChildRequest {
                name: "Asha".to_string(),
                age: 4,
                gender: Gender::Female,
                height_cm: 100.0,
                weight_kg: 16.0,
            })
            .await
            .expect("Failed to register child")
            .child;
        (AcceptanceService::new(store), child.id)
    }

    fn request(child_id: &str, recipe_id: &str, recipe_name: Option<&str>) -> LogMealRequest {
        LogMealRequest {
            child_id: child_id.to_string(),
            recipe_id: recipe_id.to_string(),
            recipe_name: recipe_name.map(str::to_string),
            status: AcceptanceStatus::FullyEaten,
            meal_type: MealType::Lunch,
        }
    }

    #[tokio::test]
    async fn test_log_meal_copies_catalog_name() {
        let (service, child_id) = setup_test().await;

        let log = service.log_meal(request(&child_id, "1", None)).await.unwrap();
        assert_eq!(log.recipe_name, find_recipe("1").unwrap().name);

        let logs = service.list_logs().await.logs;
        assert_eq!(logs, vec![log]);
    }

    #[tokio::test]
    async fn test_log_meal_for_live_recipe_uses_given_name() {
        let (service, child_id) = setup_test().await;

        let log = service
            .log_meal(request(&child_id, "rdb-2231", Some("Ragi Dosa")))
            .await
            .unwrap();
        assert_eq!(log.recipe_name, "Ragi Dosa");

        let result = service.log_meal(request(&child_id, "rdb-2231", None)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(service.list_logs().await.logs.len(), 1);
    }

    #[tokio::test]
    async fn test_log_meal_unknown_child() {
        let (service, _) = setup_test().await;
        let result = service.log_meal(request("nobody", "1", None)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_logs_for_child_filters_and_keeps_order() {
        let (service, child_id) = setup_test().await;
        let first = service.log_meal(request(&child_id, "1", None)).await.unwrap();
        let second = service.log_meal(request(&child_id, "2", None)).await.unwrap();

        let logs = service.logs_for_child(&child_id).await.logs;
        assert_eq!(logs, vec![first, second]);
        assert!(service.logs_for_child("someone-else").await.logs.is_empty());
    }
}
