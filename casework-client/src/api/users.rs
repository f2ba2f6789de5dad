//! User administration wrappers

use shared::access::{Capability, Role};
use shared::models::{User, UserCreate, UserRoleUpdate, UserStatusUpdate};

use super::query_string;
use crate::{CaseworkClient, ClientError, ClientResult, HttpClient};

impl<H: HttpClient> CaseworkClient<H> {
    /// GET /api/users
    pub async fn fetch_users(&self, company_id: Option<i64>) -> ClientResult<Vec<User>> {
        self.session().require(Capability::ViewUsers)?;
        let qs = query_string(&[("company_id", company_id.map(|v| v.to_string()))]);
        self.http.get(&format!("api/users{qs}")).await
    }

    /// POST /api/users
    pub async fn create_user(&self, payload: &UserCreate) -> ClientResult<User> {
        self.session().require(Capability::CreateUsers)?;
        self.ensure_assignable(&payload.property_role)?;
        self.http.post("api/users", payload).await
    }

    /// PUT /api/users/{id}/role
    pub async fn update_user_role(&self, target: &User, role: Role) -> ClientResult<User> {
        let session = self.session();
        session.require(Capability::UpdateRoles)?;
        session.ensure(session.capabilities().can_modify_user(target), "modify this user")?;
        self.ensure_assignable(role.as_str())?;
        let body = UserRoleUpdate {
            property_role: role.as_str().to_string(),
        };
        self.http
            .put(&format!("api/users/{}/role", target.id), &body)
            .await
    }

    /// PUT /api/users/{id}/status
    pub async fn update_user_status(&self, target: &User, is_active: bool) -> ClientResult<User> {
        let session = self.session();
        session.ensure(
            session.capabilities().can_update_status(target),
            "change this user's status",
        )?;
        self.http
            .put(
                &format!("api/users/{}/status", target.id),
                &UserStatusUpdate { is_active },
            )
            .await
    }

    fn ensure_assignable(&self, role: &str) -> ClientResult<()> {
        let assignable = Role::parse(role)
            .is_some_and(|role| self.session().capabilities().can_assign_role(role));
        if assignable {
            Ok(())
        } else {
            Err(ClientError::Forbidden(format!("Cannot assign role: {role}")))
        }
    }
}
