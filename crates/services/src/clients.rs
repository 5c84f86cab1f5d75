//! Client directory: create, search, update, and deactivation.

use lexcase_core::error::CoreError;
use lexcase_core::types::DbId;
use lexcase_db::models::client::{Client, ClientFilter, CreateClient, UpdateClient};
use lexcase_db::repositories::ClientRepo;
use lexcase_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::error::ServiceResult;
use crate::pagination::{Page, PageParams};

/// Payload for creating a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientInput {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: String,
    pub company_name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "client",
        id,
    }
}

/// Client directory service.
#[derive(Clone)]
pub struct ClientService {
    pool: DbPool,
}

impl ClientService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: CreateClientInput) -> ServiceResult<Client> {
        input.validate()?;

        let client = ClientRepo::create(
            &self.pool,
            &CreateClient {
                first_name: input.first_name,
                last_name: input.last_name,
                company_name: input.company_name,
                email: input.email.trim().to_lowercase(),
                phone: input.phone,
                address: input.address,
            },
        )
        .await?;

        tracing::info!(client_id = client.id, "Client created");
        Ok(client)
    }

    /// List clients with filters and pagination.
    pub async fn find_all(
        &self,
        filter: ClientFilter,
        page: PageParams,
    ) -> ServiceResult<Page<Client>> {
        let (limit, offset) = page.resolve();
        let total_count = ClientRepo::count(&self.pool, &filter).await?;
        let data = ClientRepo::list(&self.pool, &filter, limit, offset).await?;
        Ok(Page {
            total_count,
            limit,
            offset,
            data,
        })
    }

    pub async fn find_one(&self, id: DbId) -> ServiceResult<Client> {
        let client = ClientRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(client)
    }

    /// Update mutable client fields. Deactivated clients cannot be updated.
    pub async fn update(&self, id: DbId, mut input: UpdateClient) -> ServiceResult<Client> {
        if let Some(email) = input.email.take() {
            input.email = Some(email.trim().to_lowercase());
        }
        let client = ClientRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(client)
    }

    /// Deactivate a client (soft delete). Fails with NotFound if the client
    /// is absent or already inactive.
    pub async fn deactivate(&self, id: DbId) -> ServiceResult<()> {
        let deactivated = ClientRepo::deactivate(&self.pool, id).await?;
        if !deactivated {
            return Err(not_found(id).into());
        }
        tracing::info!(client_id = id, "Client deactivated");
        Ok(())
    }
}
