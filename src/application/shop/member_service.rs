use crate::domain::clock;
use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::password::PasswordHash;
use crate::domain::shop::{Member, MemberResponse, MemberWithProducts};
use crate::domain::validation::FieldErrors;
use crate::infrastructure::persistence::repositories::{members, purchases};
use crate::infrastructure::persistence::begin_write;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

const BAD_CREDENTIALS: &str = "Email or password is incorrect";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl MemberRequest {
    fn validate(&self) -> ServiceResult<()> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("email", self.email.as_deref(), "email is required")
            .email("email", self.email.as_deref(), "email format is invalid")
            .not_blank("name", self.name.as_deref(), "name is required")
            .not_blank("password", self.password.as_deref(), "password is required")
            .length("password", self.password.as_deref(), 4, 50, "password must be 4 to 50 characters");
        errors.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct MemberService {
    pool: SqlitePool,
}

impl MemberService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_members(&self) -> ServiceResult<Vec<MemberResponse>> {
        let mut conn = self.pool.acquire().await?;
        let all = members::find_all(&mut *conn).await?;
        Ok(all.into_iter().map(MemberResponse::from).collect())
    }

    pub async fn get_member(&self, id: i64) -> ServiceResult<MemberResponse> {
        let mut conn = self.pool.acquire().await?;
        members::find_by_id(&mut *conn, id)
            .await?
            .map(MemberResponse::from)
            .ok_or_else(|| ServiceError::not_found(format!("Member not found: {}", id)))
    }

    pub async fn create_member(&self, request: MemberRequest) -> ServiceResult<MemberResponse> {
        request.validate()?;
        let email = request.email.unwrap_or_default();

        let mut tx = begin_write(&self.pool).await?;
        if members::email_taken(&mut *tx, &email, None).await? {
            warn!("MemberService: duplicate email {}", email);
            return Err(ServiceError::Duplicated(format!("Email already registered: {}", email)));
        }

        let now = clock::now();
        let member = Member {
            id: 0,
            email,
            name: request.name.unwrap_or_default(),
            password: PasswordHash::new(request.password.as_deref().unwrap_or_default()),
            phone: request.phone,
            address: request.address,
            created_at: now,
            updated_at: now,
        };
        let member = members::insert(&mut *tx, &member).await?;
        tx.commit().await?;

        info!("MemberService: registered member {}", member.id);
        Ok(member.into())
    }

    pub async fn update_member(&self, id: i64, request: MemberRequest) -> ServiceResult<MemberResponse> {
        request.validate()?;
        let email = request.email.unwrap_or_default();

        let mut tx = begin_write(&self.pool).await?;
        let mut member = members::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Member not found: {}", id)))?;
        if members::email_taken(&mut *tx, &email, Some(id)).await? {
            return Err(ServiceError::Duplicated(format!("Email already registered: {}", email)));
        }

        member.email = email;
        member.name = request.name.unwrap_or_default();
        member.password = PasswordHash::new(request.password.as_deref().unwrap_or_default());
        member.phone = request.phone;
        member.address = request.address;
        member.updated_at = clock::now();
        members::update(&mut *tx, &member).await?;
        tx.commit().await?;

        info!("MemberService: updated member {}", member.id);
        Ok(member.into())
    }

    /// Members with purchase history cannot be removed.
    pub async fn delete_member(&self, id: i64) -> ServiceResult<()> {
        let mut tx = begin_write(&self.pool).await?;
        if members::find_by_id(&mut *tx, id).await?.is_none() {
            return Err(ServiceError::not_found(format!("Member not found: {}", id)));
        }
        if members::has_purchases(&mut *tx, id).await? {
            warn!("MemberService: member {} has purchases", id);
            return Err(ServiceError::InUse(format!("Member has purchase history: {}", id)));
        }
        members::delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!("MemberService: deleted member {}", id);
        Ok(())
    }

    pub async fn member_with_purchases(&self, id: i64) -> ServiceResult<MemberWithProducts> {
        let mut conn = self.pool.acquire().await?;
        let member = members::find_by_id(&mut *conn, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Member not found: {}", id)))?;
        let purchased_products = purchases::purchased_products(&mut *conn, id).await?;

        Ok(MemberWithProducts {
            member: member.into(),
            purchased_products,
        })
    }

    /// Unknown email and wrong password fail with the same message.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<MemberResponse> {
        let mut errors = FieldErrors::new();
        errors
            .not_blank("email", request.email.as_deref(), "email is required")
            .not_blank("password", request.password.as_deref(), "password is required");
        errors.finish()?;
        let email = request.email.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        let mut conn = self.pool.acquire().await?;
        let member = members::find_by_email(&mut *conn, &email).await?;
        match member {
            Some(member) if member.password.verify(&password) => {
                info!("MemberService: member {} logged in", member.id);
                Ok(member.into())
            }
            _ => {
                warn!("MemberService: failed login for {}", email);
                Err(ServiceError::NotAuthenticated(BAD_CREDENTIALS.to_string()))
            }
        }
    }
}
