use chrono::Utc;
use shared::{
    BmiHistoryResponse, BmiRecord, Child, ChildListResponse, ChildResponse, CreateChildRequest,
    UpdateChildRequest,
};
use tracing::{info, warn};

use crate::domain::bmi::Measurement;
use crate::error::{AppError, AppResult};
use crate::storage::{generate_id, Collection, RecordStore};

const MAX_NAME_LENGTH: usize = 100;

/// Service for registering children and tracking their BMI over time
#[derive(Clone)]
pub struct ChildService {
    store: RecordStore,
}

impl ChildService {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Register a child and record their first BMI measurement
    pub async fn register_child(&self, request: CreateChildRequest) -> AppResult<ChildResponse> {
        info!(
            "Registering child: name={}, age={}, height={}cm, weight={}kg",
            request.name, request.age, request.height_cm, request.weight_kg
        );

        let name = Self::validate_name(&request.name)?;
        let measurement = Measurement::new(request.height_cm, request.weight_kg, request.age)?;
        let (bmi, bmi_category) = measurement.classify();
        let now = Utc::now().to_rfc3339();

        let child = Child {
            id: generate_id(),
            name,
            age: request.age,
            gender: request.gender,
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            bmi,
            bmi_category,
            created_at: now.clone(),
            updated_at: now,
        };

        self.store.upsert(Collection::Children, child.clone()).await?;
        self.record_measurement(&child).await?;

        info!(
            "Registered child {} ({}) with BMI {} ({})",
            child.name, child.id, child.bmi, child.bmi_category
        );

        Ok(ChildResponse {
            child,
            success_message: "Child registered successfully".to_string(),
        })
    }

    pub async fn get_child(&self, child_id: &str) -> AppResult<Child> {
        let children: Vec<Child> = self.store.get_all(Collection::Children).await;
        children
            .into_iter()
            .find(|c| c.id == child_id)
            .ok_or_else(|| AppError::NotFound(format!("Child {}", child_id)))
    }

    pub async fn list_children(&self) -> ChildListResponse {
        let children: Vec<Child> = self.store.get_all(Collection::Children).await;
        info!("Found {} children", children.len());
        ChildListResponse { children }
    }

    /// Update a child in place. BMI and category are recomputed and every
    /// save appends a history record, even when nothing was remeasured.
    pub async fn update_child(
        &self,
        child_id: &str,
        request: UpdateChildRequest,
    ) -> AppResult<ChildResponse> {
        info!("Updating child {}: {:?}", child_id, request);

        let mut child = self.get_child(child_id).await?;

        if let Some(ref name) = request.name {
            child.name = Self::validate_name(name)?;
        }
        if let Some(gender) = request.gender {
            child.gender = gender;
        }

        let measurement = Measurement::new(
            request.height_cm.unwrap_or(child.height_cm),
            request.weight_kg.unwrap_or(child.weight_kg),
            request.age.unwrap_or(child.age),
        )?;
        let (bmi, bmi_category) = measurement.classify();
        child.age = measurement.age;
        child.height_cm = measurement.height_cm;
        child.weight_kg = measurement.weight_kg;
        child.bmi = bmi;
        child.bmi_category = bmi_category;
        child.updated_at = Utc::now().to_rfc3339();

        self.store.upsert(Collection::Children, child.clone()).await?;
        self.record_measurement(&child).await?;

        Ok(ChildResponse {
            child,
            success_message: "Child updated successfully".to_string(),
        })
    }

    /// Delete a child. Their BMI history and acceptance logs are left in place.
    pub async fn delete_child(&self, child_id: &str) -> AppResult<()> {
        info!("Deleting child: {}", child_id);

        let removed = self
            .store
            .delete_by_id::<Child>(Collection::Children, child_id)
            .await?;

        if !removed {
            warn!("Child not found for deletion: {}", child_id);
            return Err(AppError::NotFound(format!("Child {}", child_id)));
        }
        Ok(())
    }

    /// BMI measurements recorded for a child, oldest first
    pub async fn bmi_history(&self, child_id: &str) -> BmiHistoryResponse {
        let records: Vec<BmiRecord> = self.store.get_all(Collection::BmiRecords).await;
        BmiHistoryResponse {
            child_id: child_id.to_string(),
            records: records.into_iter().filter(|r| r.child_id == child_id).collect(),
        }
    }

    /// Every BMI record across all children
    pub async fn all_bmi_records(&self) -> Vec<BmiRecord> {
        self.store.get_all(Collection::BmiRecords).await
    }

    async fn record_measurement(&self, child: &Child) -> AppResult<()> {
        let record = BmiRecord {
            id: generate_id(),
            child_id: child.id.clone(),
            date: child.updated_at.clone(),
            height_cm: child.height_cm,
            weight_kg: child.weight_kg,
            bmi: child.bmi,
            category: child.bmi_category,
        };
        self.store.append(Collection::BmiRecords, record).await
    }

    fn validate_name(name: &str) -> AppResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput("Child name cannot be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::InvalidInput(format!(
                "Child name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(trimmed.to_string())
    }
}
