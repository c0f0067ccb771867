use crate::auth::AuthContext;
use crate::domains::comment::repository::CommentRepository;
use crate::domains::comment::types::{Comment, NewComment, UpdateComment};
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::participation::repository::ParticipationRepository;
use crate::domains::permission::{
    AccessControlEvaluator, AccessScope, Action, OwnershipResolver, ParentRef, ResourceKind,
};
use crate::domains::user::repository::UserRepository;
use crate::errors::{ServiceError, ServiceResult, ValidationError};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait CommentService: Send + Sync {
    async fn create_comment(&self, new: NewComment, auth: &AuthContext) -> ServiceResult<Comment>;

    /// Same as `create_comment`, but the comment has to target a foundation
    async fn create_foundation_comment(&self, new: NewComment, auth: &AuthContext) -> ServiceResult<Comment>;

    /// Everything for admins and foundations, the caller's own comments otherwise
    async fn list_comments(&self, auth: &AuthContext) -> ServiceResult<Vec<Comment>>;

    async fn list_user_comments(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Comment>>;

    async fn list_target_comments(&self, target: ParentRef) -> ServiceResult<Vec<Comment>>;

    async fn get_comment(&self, id: Uuid) -> ServiceResult<Comment>;

    async fn update_comment(&self, id: Uuid, update: UpdateComment, auth: &AuthContext) -> ServiceResult<Comment>;

    async fn delete_comment(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct CommentServiceImpl {
    repo: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
    participation: Arc<dyn ParticipationRepository>,
    resolver: Arc<dyn OwnershipResolver>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl CommentServiceImpl {
    pub fn new(
        repo: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        participation: Arc<dyn ParticipationRepository>,
        resolver: Arc<dyn OwnershipResolver>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { repo, users, participation, resolver, evaluator }
    }

    /// Who may comment where: donations by the donor or the receiving
    /// foundation, social actions by the publisher or accepted participants,
    /// foundations by anyone. A missing target is `EntityNotFound`.
    async fn check_target(&self, subject: Uuid, target: ParentRef, skip_membership: bool) -> ServiceResult<()> {
        let owners = self.resolver.owning_accounts(target).await?;
        if skip_membership {
            return Ok(());
        }

        match target {
            ParentRef::Foundation(_) => Ok(()),
            ParentRef::Donation(_) if owners.contains(&subject) => Ok(()),
            ParentRef::Donation(_) => Err(ServiceError::PermissionDenied(
                "You do not have permission to comment on this donation".to_string(),
            )),
            ParentRef::SocialAction(action_id) => {
                if owners.contains(&subject) {
                    return Ok(());
                }
                let participant = self
                    .participation
                    .find_for_user_and_action(subject, action_id)
                    .await?
                    .map(|r| r.is_accepted())
                    .unwrap_or(false);
                if participant {
                    Ok(())
                } else {
                    Err(ServiceError::PermissionDenied(
                        "You do not have permission to comment on this social action".to_string(),
                    ))
                }
            }
        }
    }
}

#[async_trait]
impl CommentService for CommentServiceImpl {
    async fn create_comment(&self, new: NewComment, auth: &AuthContext) -> ServiceResult<Comment> {
        let decision = self.evaluator.authorize(auth, Action::Create, ResourceKind::Comment, &[new.user_id])?;
        new.validate()?;
        let target = new.target()?;

        self.users.find_by_id(new.user_id).await?;
        self.check_target(new.user_id, target, decision.via_admin()).await?;

        Ok(self.repo.create(new.user_id, target, &new.text).await?)
    }

    async fn create_foundation_comment(&self, new: NewComment, auth: &AuthContext) -> ServiceResult<Comment> {
        if new.foundation_id.is_none() {
            return Err(ValidationError::required("foundation_id").into());
        }
        self.create_comment(new, auth).await
    }

    async fn list_comments(&self, auth: &AuthContext) -> ServiceResult<Vec<Comment>> {
        let decision = self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Comment, &[auth.user_id])?;

        let comments = match decision.scope {
            AccessScope::All => self.repo.find_all().await?,
            AccessScope::Own => self.repo.find_by_user(auth.user_id).await?,
        };
        Ok(comments)
    }

    async fn list_user_comments(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Comment>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Comment, &[user_id])?;
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn list_target_comments(&self, target: ParentRef) -> ServiceResult<Vec<Comment>> {
        Ok(self.repo.find_by_target(target).await?)
    }

    async fn get_comment(&self, id: Uuid) -> ServiceResult<Comment> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn update_comment(&self, id: Uuid, update: UpdateComment, auth: &AuthContext) -> ServiceResult<Comment> {
        let comment = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Comment, &[comment.user_id])?;
        update.validate()?;

        match update.text {
            Some(text) => Ok(self.repo.update_text(id, &text).await?),
            None => Ok(comment),
        }
    }

    async fn delete_comment(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let comment = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Comment, &[comment.user_id])?;

        self.repo.hard_delete(id).await?;
        log::info!("Comment {} deleted by {}", id, auth.user_id);
        Ok(())
    }
}
