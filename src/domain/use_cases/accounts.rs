use tracing::error;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::domain::password::validate_password_complexity;
use crate::entities::account::{Account, AccountCreatedResponse, RegisterAccountRequest};
use crate::entities::event::NotificationEvent;
use crate::errors::AppError;
use crate::repositories::account::AccountRepository;
use crate::repositories::events::EventPublisher;
use crate::utils::valid_uuid::valid_uuid;

pub struct AccountHandler<A, P>
where
    A: AccountRepository,
    P: EventPublisher,
{
    pub account_repo: A,
    pub events: P,
}

impl<A, P> AccountHandler<A, P>
where
    A: AccountRepository,
    P: EventPublisher,
{
    pub fn new(account_repo: A, events: P) -> Self {
        AccountHandler {
            account_repo,
            events,
        }
    }

    /// Registers a new account after validation and password hashing.
    pub async fn register(
        &self,
        request: RegisterAccountRequest,
    ) -> Result<AccountCreatedResponse, AppError> {
        request.validate()?;
        validate_password_complexity(&request.password)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let password_hash = hash_password(&request.password)?;
        let insert = request.prepare_for_insert(password_hash);

        let id = self.account_repo.create_account(&insert).await?;

        // The account exists either way; a failed welcome mail is not worth
        // failing the registration over.
        if let Err(e) = self
            .events
            .publish(&NotificationEvent::welcome(&insert.email))
            .await
        {
            error!("Welcome notification failed: {e}");
        }

        Ok(AccountCreatedResponse {
            id,
            message: "Account registered successfully".to_string(),
        })
    }

    /// Sets the moderation flag. Applying the current state again succeeds
    /// and reports the unchanged account.
    pub async fn set_blocked(&self, account_id: &str, blocked: bool) -> Result<Account, AppError> {
        let id = valid_uuid(account_id)?;

        self.account_repo
            .set_blocked(&id, blocked)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::auth::password::verify_password;
    use crate::entities::account::{AccountInsert, Role};
    use crate::repositories::account::MockAccountRepository;
    use crate::repositories::events::MockEventPublisher;

    fn request(email: &str) -> RegisterAccountRequest {
        RegisterAccountRequest {
            email: email.to_string(),
            password: "Sufficient1".to_string(),
            role: Role::User,
        }
    }

    fn blocked_account(id: Uuid, blocked: bool) -> Account {
        Account {
            id,
            email: "user@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::User,
            is_blocked: blocked,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn register_stores_a_verifiable_hash_and_sends_welcome() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_create_account()
            .withf(|insert: &AccountInsert| {
                insert.email == "user@example.com"
                    && insert.password_hash != "Sufficient1"
                    && verify_password("Sufficient1", &insert.password_hash).unwrap()
            })
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let mut events = MockEventPublisher::new();
        events
            .expect_publish()
            .withf(|event: &NotificationEvent| event.recipient == "user@example.com")
            .times(1)
            .returning(|_| Ok(()));

        let response = AccountHandler::new(account_repo, events)
            .register(request("user@example.com"))
            .await
            .unwrap();

        assert_eq!(response.message, "Account registered successfully");
    }

    #[tokio::test]
    async fn register_rejects_invalid_email_before_any_call() {
        let handler = AccountHandler::new(MockAccountRepository::new(), MockEventPublisher::new());

        let err = handler.register(request("not-an-email")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn register_rejects_weak_passwords() {
        let handler = AccountHandler::new(MockAccountRepository::new(), MockEventPublisher::new());

        let mut weak = request("user@example.com");
        weak.password = "alllowercase".to_string();

        let err = handler.register(weak).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn duplicate_email_surfaces_as_conflict() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_create_account()
            .returning(|_| Err(AppError::Conflict("An account with this email already exists".to_string())));

        // No publish expectation: the welcome must not go out.
        let err = AccountHandler::new(account_repo, MockEventPublisher::new())
            .register(request("user@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn registration_outlives_a_dead_welcome_channel() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_create_account()
            .returning(|_| Ok(Uuid::new_v4()));

        let mut events = MockEventPublisher::new();
        events
            .expect_publish()
            .returning(|_| Err(AppError::InternalError("channel down".to_string())));

        let response = AccountHandler::new(account_repo, events)
            .register(request("user@example.com"))
            .await;

        assert!(response.is_ok());
    }

    #[tokio::test]
    async fn blocking_twice_reports_the_same_state() {
        let id = Uuid::new_v4();

        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_set_blocked()
            .times(2)
            .returning(move |account_id, blocked| Ok(Some(blocked_account(*account_id, blocked))));

        let handler = AccountHandler::new(account_repo, MockEventPublisher::new());

        let first = handler.set_blocked(&id.to_string(), true).await.unwrap();
        let second = handler.set_blocked(&id.to_string(), true).await.unwrap();

        assert!(first.is_blocked);
        assert!(second.is_blocked);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn unblocking_clears_the_flag() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_set_blocked()
            .withf(|_, blocked| !*blocked)
            .times(1)
            .returning(move |account_id, blocked| Ok(Some(blocked_account(*account_id, blocked))));

        let handler = AccountHandler::new(account_repo, MockEventPublisher::new());
        let account = handler
            .set_blocked(&Uuid::new_v4().to_string(), false)
            .await
            .unwrap();

        assert!(!account.is_blocked);
    }

    #[tokio::test]
    async fn blocking_an_unknown_account_is_not_found() {
        let mut account_repo = MockAccountRepository::new();
        account_repo
            .expect_set_blocked()
            .returning(|_, _| Ok(None));

        let err = AccountHandler::new(account_repo, MockEventPublisher::new())
            .set_blocked(&Uuid::new_v4().to_string(), true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn blocking_with_a_malformed_id_is_rejected() {
        let handler = AccountHandler::new(MockAccountRepository::new(), MockEventPublisher::new());

        let err = handler.set_blocked("42", true).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
