//! Equipment service

use crate::{
    error::AppResult,
    models::equipment::{CreateEquipment, Equipment},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
}

impl EquipmentService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    pub async fn create(&self, owner_id: i32, data: &CreateEquipment) -> AppResult<Equipment> {
        self.repository.equipment.create(owner_id, data).await
    }
}
