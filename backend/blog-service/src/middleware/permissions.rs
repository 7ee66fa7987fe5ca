/// Ownership-based permission checks
///
/// Posts and comments can be modified by their author or an admin;
/// feedback can only be deleted by the user who left it.
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Comment, Feedback, Post};

/// Check if a user may modify or delete a post
pub fn check_post_access(user: &AuthUser, post: &Post) -> Result<()> {
    if post.author_id == user.id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to modify this post".to_string(),
        ))
    }
}

/// Check if a user may modify or delete a comment
pub fn check_comment_access(user: &AuthUser, comment: &Comment) -> Result<()> {
    if comment.user_id == user.id || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to modify this comment".to_string(),
        ))
    }
}

/// Check if a user may delete a feedback row. Owner only, no admin override.
pub fn check_feedback_access(user: &AuthUser, feedback: &Feedback) -> Result<()> {
    if feedback.user_id == user.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You don't have permission to delete this feedback".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(id: Uuid, role: &str) -> AuthUser {
        AuthUser {
            id,
            username: "tester".to_string(),
            role: role.to_string(),
        }
    }

    fn post(author_id: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            author_id,
            title: "t".to_string(),
            slug: "t".to_string(),
            description: None,
            content: "c".to_string(),
            tags: vec![],
            cover_image: None,
            view_count: 0,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn author_can_modify_own_post() {
        let author = Uuid::new_v4();
        assert!(check_post_access(&user(author, "user"), &post(author)).is_ok());
    }

    #[test]
    fn stranger_cannot_modify_post() {
        let result = check_post_access(&user(Uuid::new_v4(), "user"), &post(Uuid::new_v4()));
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn admin_can_modify_any_post() {
        assert!(check_post_access(&user(Uuid::new_v4(), "admin"), &post(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn admin_cannot_delete_someone_elses_feedback() {
        let feedback = Feedback {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            rating: 4,
            comment: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let result = check_feedback_access(&user(Uuid::new_v4(), "admin"), &feedback);
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
