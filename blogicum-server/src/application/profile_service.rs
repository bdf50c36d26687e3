use chrono::{DateTime, Utc};
use tracing::info;

use crate::application::blog_service::fetch_page;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::pagination::{Page, Pagination};
use crate::domain::post::PostListing;
use crate::domain::user::{UpdateProfileRequest, User};
use crate::domain::visibility::PostQuery;

#[derive(Debug, Clone)]
pub(crate) struct ProfilePosts {
    pub(crate) user: User,
    pub(crate) posts: Page<PostListing>,
}

pub(crate) struct ProfileService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    users: U,
    posts: P,
    page_size: u32,
}

impl<U, P> ProfileService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    pub(crate) fn new(users: U, posts: P, page_size: u32) -> Self {
        Self {
            users,
            posts,
            page_size,
        }
    }

    /// The owner sees every own post; everyone else only visible ones.
    pub(crate) async fn profile(
        &self,
        viewer: Option<i64>,
        username: &str,
        page: u32,
        now: DateTime<Utc>,
    ) -> Result<ProfilePosts, DomainError> {
        let pagination = Pagination::new(page, self.page_size)?;
        let user = self
            .users
            .find_by_username(username)
            .await?
            .map(|creds| creds.user)
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        let query = if viewer == Some(user.id) {
            PostQuery::unrestricted().by_author(user.id)
        } else {
            PostQuery::public(now).by_author(user.id)
        };
        let posts = fetch_page(&self.posts, &query, pagination).await?;
        Ok(ProfilePosts { user, posts })
    }

    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        req: UpdateProfileRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;
        let patch = ProfilePatch {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
        };
        let user = self
            .users
            .update_profile(actor_user_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user id: {actor_user_id}")))?;
        info!(user_id = user.id, "profile updated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::ProfileService;
    use crate::application::blog_service::BlogService;
    use crate::application::testing::MemoryStore;
    use crate::domain::error::DomainError;
    use crate::domain::post::PostRequest;
    use crate::domain::user::UpdateProfileRequest;
    use crate::domain::visibility::tests::fixed_now;

    fn post(title: &str, is_published: bool, offset: Duration) -> PostRequest {
        PostRequest {
            title: title.to_string(),
            text: "body".to_string(),
            image: None,
            pub_date: Some(fixed_now() + offset),
            is_published: Some(is_published),
            category_id: None,
            location_id: None,
        }
    }

    #[tokio::test]
    async fn owner_sees_drafts_and_scheduled_posts_others_do_not() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let blog = BlogService::new(store.clone(), store.clone(), store.clone(), 10);
        let profiles = ProfileService::new(store.clone(), store.clone(), 10);

        for req in [
            post("public", true, -Duration::hours(2)),
            post("draft", false, -Duration::hours(1)),
            post("scheduled", true, Duration::days(1)),
        ] {
            blog.create_post(alice.id, req, fixed_now())
                .await
                .expect("create_post must succeed");
        }

        let own = profiles
            .profile(Some(alice.id), "alice", 1, fixed_now())
            .await
            .expect("own profile must load");
        let titles: Vec<&str> = own.posts.items.iter().map(|l| l.post.title.as_str()).collect();
        assert_eq!(titles, vec!["scheduled", "draft", "public"]);

        let foreign = profiles
            .profile(Some(bob.id), "alice", 1, fixed_now())
            .await
            .expect("foreign profile must load");
        let titles: Vec<&str> = foreign
            .posts
            .items
            .iter()
            .map(|l| l.post.title.as_str())
            .collect();
        assert_eq!(titles, vec!["public"]);
        assert_eq!(foreign.user.username, "alice");

        let anonymous = profiles
            .profile(None, "alice", 1, fixed_now())
            .await
            .expect("anonymous profile must load");
        assert_eq!(anonymous.posts.total_items, 1);
    }

    #[tokio::test]
    async fn profile_lists_only_that_authors_posts() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let blog = BlogService::new(store.clone(), store.clone(), store.clone(), 10);
        let profiles = ProfileService::new(store.clone(), store.clone(), 10);

        blog.create_post(alice.id, post("by alice", true, -Duration::hours(1)), fixed_now())
            .await
            .expect("create_post must succeed");
        blog.create_post(bob.id, post("by bob", true, -Duration::hours(1)), fixed_now())
            .await
            .expect("create_post must succeed");

        let page = profiles
            .profile(None, "bob", 1, fixed_now())
            .await
            .expect("profile must load");
        assert_eq!(page.posts.items.len(), 1);
        assert_eq!(page.posts.items[0].post.author.id, bob.id);
    }

    #[tokio::test]
    async fn unknown_username_is_not_found() {
        let store = MemoryStore::new();
        let profiles = ProfileService::new(store.clone(), store.clone(), 10);

        let err = profiles
            .profile(None, "ghost", 1, fixed_now())
            .await
            .expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_profile_touches_only_the_caller() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        let bob = store.add_user("bob");
        let profiles = ProfileService::new(store.clone(), store.clone(), 10);

        let updated = profiles
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    first_name: " Alice ".to_string(),
                    last_name: "Liddell".to_string(),
                    email: "Alice@Wonderland.org".to_string(),
                },
            )
            .await
            .expect("update must succeed");
        assert_eq!(updated.first_name, "Alice");
        assert_eq!(updated.email, "alice@wonderland.org");

        let bob_view = profiles
            .profile(None, "bob", 1, fixed_now())
            .await
            .expect("profile must load");
        assert_eq!(bob_view.user.id, bob.id);
        assert_eq!(bob_view.user.first_name, "");
    }

    #[tokio::test]
    async fn update_profile_with_taken_email_is_conflict() {
        let store = MemoryStore::new();
        let alice = store.add_user("alice");
        store.add_user("bob");
        let profiles = ProfileService::new(store.clone(), store.clone(), 10);

        let err = profiles
            .update_profile(
                alice.id,
                UpdateProfileRequest {
                    first_name: String::new(),
                    last_name: String::new(),
                    email: "bob@example.com".to_string(),
                },
            )
            .await
            .expect_err("email is taken");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }
}
