use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::notification::NotificationDispatcher;
use crate::domains::permission::{AccessControlEvaluator, Action, ResourceKind};
use crate::domains::suggestion::repository::SuggestionRepository;
use crate::domains::suggestion::types::{NewSuggestion, Suggestion, UpdateSuggestion};
use crate::domains::user::repository::UserRepository;
use crate::errors::ServiceResult;
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait SuggestionService: Send + Sync {
    async fn create_suggestion(&self, new: NewSuggestion, auth: &AuthContext) -> ServiceResult<Suggestion>;

    async fn list_suggestions(&self, auth: &AuthContext) -> ServiceResult<Vec<Suggestion>>;

    async fn list_unprocessed(&self, auth: &AuthContext) -> ServiceResult<Vec<Suggestion>>;

    async fn list_user_suggestions(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Suggestion>>;

    async fn get_suggestion(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Suggestion>;

    /// Marks the suggestion processed; the author hears about it once
    async fn process_suggestion(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Suggestion>;

    async fn update_suggestion(&self, id: Uuid, update: UpdateSuggestion, auth: &AuthContext) -> ServiceResult<Suggestion>;

    async fn delete_suggestion(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct SuggestionServiceImpl {
    repo: Arc<dyn SuggestionRepository>,
    users: Arc<dyn UserRepository>,
    evaluator: Arc<AccessControlEvaluator>,
    notifier: NotificationDispatcher,
}

impl SuggestionServiceImpl {
    pub fn new(
        repo: Arc<dyn SuggestionRepository>,
        users: Arc<dyn UserRepository>,
        evaluator: Arc<AccessControlEvaluator>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self { repo, users, evaluator, notifier }
    }

    async fn announce_processed(&self, suggestion: &Suggestion) {
        self.notifier
            .dispatch(
                suggestion.user_id,
                format!("Your suggestion has been processed: \"{}\"", suggestion.preview()),
            )
            .await;
    }
}

#[async_trait]
impl SuggestionService for SuggestionServiceImpl {
    async fn create_suggestion(&self, new: NewSuggestion, auth: &AuthContext) -> ServiceResult<Suggestion> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Suggestion, &[new.user_id])?;
        new.validate()?;
        self.users.find_by_id(new.user_id).await?;

        let suggestion = self.repo.create(&new).await?;
        log::info!("Suggestion {} received from {}", suggestion.id, suggestion.user_id);

        self.notifier
            .dispatch(
                suggestion.user_id,
                "Your suggestion has been received and will be reviewed soon.",
            )
            .await;
        Ok(suggestion)
    }

    async fn list_suggestions(&self, auth: &AuthContext) -> ServiceResult<Vec<Suggestion>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Suggestion, &[])?;
        Ok(self.repo.find_all().await?)
    }

    async fn list_unprocessed(&self, auth: &AuthContext) -> ServiceResult<Vec<Suggestion>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Suggestion, &[])?;
        Ok(self.repo.find_unprocessed().await?)
    }

    async fn list_user_suggestions(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Suggestion>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Suggestion, &[user_id])?;
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn get_suggestion(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Suggestion> {
        let suggestion = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::ReadOne, ResourceKind::Suggestion, &[suggestion.user_id])?;
        Ok(suggestion)
    }

    async fn process_suggestion(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Suggestion> {
        self.evaluator.authorize_suggestion_processing(auth)?;

        let current = self.repo.find_by_id(id).await?;
        if current.processed {
            return Ok(current);
        }

        let suggestion = self.repo.update(id, None, Some(true)).await?;
        log::info!("Suggestion {} processed by {}", id, auth.user_id);
        self.announce_processed(&suggestion).await;
        Ok(suggestion)
    }

    async fn update_suggestion(&self, id: Uuid, update: UpdateSuggestion, auth: &AuthContext) -> ServiceResult<Suggestion> {
        let current = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Suggestion, &[current.user_id])?;
        update.validate()?;

        let flips = update.processed.filter(|processed| *processed != current.processed);
        if flips.is_some() {
            self.evaluator.authorize_suggestion_processing(auth)?;
        }

        let suggestion = self.repo.update(id, update.content.as_deref(), flips).await?;
        if flips == Some(true) {
            self.announce_processed(&suggestion).await;
        }
        Ok(suggestion)
    }

    async fn delete_suggestion(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let current = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Suggestion, &[current.user_id])?;

        self.repo.hard_delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::suggestion::types::{NewSuggestion, UpdateSuggestion};
    use crate::errors::ServiceError;
    use crate::test_support::Harness;
    use crate::types::AccountType;

    #[tokio::test]
    async fn authors_are_acknowledged_and_told_once_processed() {
        let h = Harness::new().await;
        let author = h.account("author@example.org", AccountType::User).await;
        let (org, _) = h.foundation("org@example.org").await;
        let svc = &h.app.suggestions;

        let content = "Please publish the volunteering calendar a month ahead of time";
        let suggestion = svc
            .create_suggestion(NewSuggestion { user_id: author.user_id, content: content.to_string() }, &author)
            .await
            .unwrap();
        assert!(!suggestion.processed);
        assert_eq!(h.notification_count(author.user_id).await, 1);

        assert!(matches!(svc.process_suggestion(suggestion.id, &author).await, Err(ServiceError::PermissionDenied(_))));

        let processed = svc.process_suggestion(suggestion.id, &org).await.unwrap();
        assert!(processed.processed);
        svc.process_suggestion(suggestion.id, &org).await.unwrap();
        assert_eq!(h.notification_count(author.user_id).await, 2);

        let inbox = h.app.notifications.list_my_notifications(false, &author).await.unwrap();
        assert!(inbox.iter().any(|n| n.message.ends_with("...\"")));
    }

    #[tokio::test]
    async fn authors_edit_content_but_not_the_processed_flag() {
        let h = Harness::new().await;
        let author = h.account("author@example.org", AccountType::User).await;
        let other = h.account("other@example.org", AccountType::User).await;
        let svc = &h.app.suggestions;

        let suggestion = svc
            .create_suggestion(NewSuggestion { user_id: author.user_id, content: "Idea".to_string() }, &author)
            .await
            .unwrap();

        let edit = |processed| UpdateSuggestion { content: Some("Better idea".to_string()), processed };
        assert!(matches!(
            svc.update_suggestion(suggestion.id, edit(None), &other).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        assert!(matches!(
            svc.update_suggestion(suggestion.id, edit(Some(true)), &author).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        // an unchanged flag is not a processing attempt
        let updated = svc.update_suggestion(suggestion.id, edit(Some(false)), &author).await.unwrap();
        assert_eq!(updated.content, "Better idea");

        let writer = h.account("admin@escritor.com", AccountType::User).await;
        let processed = svc.update_suggestion(suggestion.id, UpdateSuggestion { processed: Some(true), ..Default::default() }, &writer).await.unwrap();
        assert!(processed.processed);
        assert_eq!(h.notification_count(author.user_id).await, 2);
    }

    #[tokio::test]
    async fn listings_follow_scope() {
        let h = Harness::new().await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let (org, _) = h.foundation("org@example.org").await;
        let svc = &h.app.suggestions;

        for (who, text) in [(&alice, "First"), (&bob, "Second")] {
            svc.create_suggestion(NewSuggestion { user_id: who.user_id, content: text.to_string() }, who).await.unwrap();
        }

        let mine = svc.list_suggestions(&alice).await;
        assert!(matches!(mine, Err(ServiceError::PermissionDenied(_))));
        assert_eq!(svc.list_user_suggestions(alice.user_id, &alice).await.unwrap().len(), 1);
        assert!(matches!(
            svc.list_user_suggestions(bob.user_id, &alice).await,
            Err(ServiceError::PermissionDenied(_))
        ));

        assert_eq!(svc.list_suggestions(&org).await.unwrap().len(), 2);
        let reader = h.account("admin@lector.com", AccountType::User).await;
        assert_eq!(svc.list_suggestions(&reader).await.unwrap().len(), 2);
        let backlog = svc.list_unprocessed(&org).await.unwrap();
        assert_eq!(backlog[0].content, "First");
    }
}
