//! In-memory store implementing every repository trait, shared by service
//! tests. Listing semantics come from `PostQuery::matches`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::catalog_repository::{
    CategoryFields, CategoryRepository, LocationFields, LocationRepository,
};
use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::post_repository::{NewPost, PostModeration, PostPatch, PostRepository};
use crate::data::user_repository::{NewUser, ProfilePatch, UserCredentials, UserRepository};
use crate::domain::catalog::{Category, CategoryRef, Location, LocationRef};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::pagination::Pagination;
use crate::domain::post::{Post, PostListing};
use crate::domain::user::{Author, User};
use crate::domain::visibility::PostQuery;

#[derive(Debug, Clone)]
struct PostRecord {
    id: i64,
    title: String,
    text: String,
    image: Option<String>,
    pub_date: DateTime<Utc>,
    is_published: bool,
    author_id: i64,
    category_id: Option<i64>,
    location_id: Option<i64>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CommentRecord {
    id: i64,
    text: String,
    post_id: i64,
    author_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    users: Vec<UserCredentials>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<PostRecord>,
    comments: Vec<CommentRecord>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn author(&self, id: i64) -> Result<Author, DomainError> {
        self.users
            .iter()
            .find(|creds| creds.user.id == id)
            .map(|creds| Author {
                id: creds.user.id,
                username: creds.user.username.clone(),
            })
            .ok_or_else(|| DomainError::NotFound("author".to_string()))
    }

    fn check_references(
        &self,
        category_id: Option<i64>,
        location_id: Option<i64>,
    ) -> Result<(), DomainError> {
        if let Some(id) = category_id {
            if !self.categories.iter().any(|c| c.id == id) {
                return Err(DomainError::NotFound("category".to_string()));
            }
        }
        if let Some(id) = location_id {
            if !self.locations.iter().any(|l| l.id == id) {
                return Err(DomainError::NotFound("location".to_string()));
            }
        }
        Ok(())
    }

    fn hydrate_post(&self, record: &PostRecord) -> Result<Post, DomainError> {
        Ok(Post {
            id: record.id,
            title: record.title.clone(),
            text: record.text.clone(),
            image: record.image.clone(),
            pub_date: record.pub_date,
            is_published: record.is_published,
            author: self.author(record.author_id)?,
            category: record.category_id.and_then(|id| {
                self.categories
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| CategoryRef {
                        id: c.id,
                        slug: c.slug.clone(),
                        title: c.title.clone(),
                        is_published: c.is_published,
                    })
            }),
            location: record.location_id.and_then(|id| {
                self.locations
                    .iter()
                    .find(|l| l.id == id)
                    .map(|l| LocationRef {
                        id: l.id,
                        name: l.name.clone(),
                        is_published: l.is_published,
                    })
            }),
            created_at: record.created_at,
        })
    }

    fn hydrate_comment(&self, record: &CommentRecord) -> Result<Comment, DomainError> {
        Ok(Comment {
            id: record.id,
            text: record.text.clone(),
            post_id: record.post_id,
            author: self.author(record.author_id)?,
            created_at: record.created_at,
        })
    }

    fn comment_count(&self, post_id: i64) -> i64 {
        self.comments.iter().filter(|c| c.post_id == post_id).count() as i64
    }

    /// Posts matching `query`, newest `pub_date` first. The sort is stable over
    /// insertion order, like `ORDER BY pub_date DESC, id ASC`.
    fn matching_posts(&self, query: &PostQuery) -> Result<Vec<Post>, DomainError> {
        let mut posts = Vec::new();
        for record in &self.posts {
            let post = self.hydrate_post(record)?;
            if query.matches(&post) {
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));
        Ok(posts)
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store mutex poisoned")
    }

    pub(crate) fn add_user(&self, username: &str) -> User {
        let mut state = self.lock();
        let id = state.next_id();
        let user = User::new(id, username, format!("{username}@example.com"), Utc::now())
            .expect("test user must be valid");
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: String::new(),
        });
        user
    }

    pub(crate) fn add_staff(&self, username: &str) -> User {
        let user = self.add_user(username).with_staff(true);
        let mut state = self.lock();
        if let Some(creds) = state.users.iter_mut().find(|c| c.user.id == user.id) {
            creds.user.is_staff = true;
        }
        user
    }

    pub(crate) fn add_category(&self, slug: &str, title: &str, is_published: bool) -> Category {
        let mut state = self.lock();
        let category = Category {
            id: state.next_id(),
            slug: slug.to_string(),
            title: title.to_string(),
            description: String::new(),
            is_published,
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        category
    }

    pub(crate) fn add_location(&self, name: &str) -> Location {
        let mut state = self.lock();
        let location = Location {
            id: state.next_id(),
            name: name.to_string(),
            is_published: true,
            created_at: Utc::now(),
        };
        state.locations.push(location.clone());
        location
    }

    pub(crate) fn has_post(&self, id: i64) -> bool {
        self.lock().posts.iter().any(|p| p.id == id)
    }

    pub(crate) fn has_comment(&self, id: i64) -> bool {
        self.lock().comments.iter().any(|c| c.id == id)
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut state = self.lock();
        state.author(input.author_id)?;
        state.check_references(input.category_id, input.location_id)?;

        let record = PostRecord {
            id: state.next_id(),
            title: input.title,
            text: input.text,
            image: input.image,
            pub_date: input.pub_date,
            is_published: input.is_published,
            author_id: input.author_id,
            category_id: input.category_id,
            location_id: input.location_id,
            created_at: Utc::now(),
        };
        let post = state.hydrate_post(&record)?;
        state.posts.push(record);
        Ok(post)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let state = self.lock();
        state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|record| state.hydrate_post(record))
            .transpose()
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<PostListing>, DomainError> {
        let mut state = self.lock();
        state.check_references(patch.category_id, patch.location_id)?;

        let Some(record) = state
            .posts
            .iter_mut()
            .find(|p| p.id == post_id && p.author_id == owner_id)
        else {
            return Ok(None);
        };
        record.title = patch.title;
        record.text = patch.text;
        record.image = patch.image;
        record.pub_date = patch.pub_date;
        record.is_published = patch.is_published;
        record.category_id = patch.category_id;
        record.location_id = patch.location_id;
        let record = record.clone();

        Ok(Some(PostListing {
            post: state.hydrate_post(&record)?,
            comment_count: state.comment_count(record.id),
        }))
    }

    async fn moderate_post(
        &self,
        post_id: i64,
        moderation: PostModeration,
    ) -> Result<Option<PostListing>, DomainError> {
        let mut state = self.lock();
        state.check_references(moderation.category_id, moderation.location_id)?;

        let Some(record) = state.posts.iter_mut().find(|p| p.id == post_id) else {
            return Ok(None);
        };
        record.is_published = moderation.is_published;
        record.category_id = moderation.category_id;
        record.location_id = moderation.location_id;
        let record = record.clone();

        Ok(Some(PostListing {
            post: state.hydrate_post(&record)?,
            comment_count: state.comment_count(record.id),
        }))
    }

    async fn delete_post_owned(&self, post_id: i64, owner_id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.posts.len();
        state
            .posts
            .retain(|p| !(p.id == post_id && p.author_id == owner_id));
        let deleted = state.posts.len() < before;
        if deleted {
            state.comments.retain(|c| c.post_id != post_id);
        }
        Ok(deleted)
    }

    async fn list_posts(
        &self,
        query: &PostQuery,
        pagination: Pagination,
    ) -> Result<Vec<PostListing>, DomainError> {
        let state = self.lock();
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);

        Ok(state
            .matching_posts(query)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| PostListing {
                comment_count: state.comment_count(post.id),
                post,
            })
            .collect())
    }

    async fn count_posts(&self, query: &PostQuery) -> Result<i64, DomainError> {
        Ok(self.lock().matching_posts(query)?.len() as i64)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let mut state = self.lock();
        if !state.posts.iter().any(|p| p.id == input.post_id) {
            return Err(DomainError::NotFound("post".to_string()));
        }
        let record = CommentRecord {
            id: state.next_id(),
            text: input.text,
            post_id: input.post_id,
            author_id: input.author_id,
            created_at: Utc::now(),
        };
        let comment = state.hydrate_comment(&record)?;
        state.comments.push(record);
        Ok(comment)
    }

    async fn get_comment(&self, id: i64) -> Result<Option<Comment>, DomainError> {
        let state = self.lock();
        state
            .comments
            .iter()
            .find(|c| c.id == id)
            .map(|record| state.hydrate_comment(record))
            .transpose()
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let state = self.lock();
        state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|record| state.hydrate_comment(record))
            .collect()
    }

    async fn update_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
        text: String,
    ) -> Result<Option<Comment>, DomainError> {
        let mut state = self.lock();
        let Some(record) = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id && c.author_id == owner_id)
        else {
            return Ok(None);
        };
        record.text = text;
        let record = record.clone();
        state.hydrate_comment(&record).map(Some)
    }

    async fn delete_comment_owned(
        &self,
        comment_id: i64,
        owner_id: i64,
    ) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.comments.len();
        state
            .comments
            .retain(|c| !(c.id == comment_id && c.author_id == owner_id));
        Ok(state.comments.len() < before)
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(&self, input: CategoryFields) -> Result<Category, DomainError> {
        let mut state = self.lock();
        if state.categories.iter().any(|c| c.slug == input.slug) {
            return Err(DomainError::AlreadyExists("category slug".to_string()));
        }
        let category = Category {
            id: state.next_id(),
            slug: input.slug,
            title: input.title,
            description: input.description,
            is_published: input.is_published,
            created_at: Utc::now(),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i64,
        input: CategoryFields,
    ) -> Result<Option<Category>, DomainError> {
        let mut state = self.lock();
        if state
            .categories
            .iter()
            .any(|c| c.slug == input.slug && c.id != id)
        {
            return Err(DomainError::AlreadyExists("category slug".to_string()));
        }
        let Some(category) = state.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.slug = input.slug;
        category.title = input.title;
        category.description = input.description;
        category.is_published = input.is_published;
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        let deleted = state.categories.len() < before;
        if deleted {
            for post in state.posts.iter_mut().filter(|p| p.category_id == Some(id)) {
                post.category_id = None;
            }
        }
        Ok(deleted)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, DomainError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.slug == slug && c.is_published)
            .cloned())
    }

    async fn list_categories(&self, published_only: bool) -> Result<Vec<Category>, DomainError> {
        Ok(self
            .lock()
            .categories
            .iter()
            .filter(|c| c.is_published || !published_only)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LocationRepository for MemoryStore {
    async fn create_location(&self, input: LocationFields) -> Result<Location, DomainError> {
        let mut state = self.lock();
        let location = Location {
            id: state.next_id(),
            name: input.name,
            is_published: input.is_published,
            created_at: Utc::now(),
        };
        state.locations.push(location.clone());
        Ok(location)
    }

    async fn update_location(
        &self,
        id: i64,
        input: LocationFields,
    ) -> Result<Option<Location>, DomainError> {
        let mut state = self.lock();
        let Some(location) = state.locations.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        location.name = input.name;
        location.is_published = input.is_published;
        Ok(Some(location.clone()))
    }

    async fn delete_location(&self, id: i64) -> Result<bool, DomainError> {
        let mut state = self.lock();
        let before = state.locations.len();
        state.locations.retain(|l| l.id != id);
        let deleted = state.locations.len() < before;
        if deleted {
            for post in state.posts.iter_mut().filter(|p| p.location_id == Some(id)) {
                post.location_id = None;
            }
        }
        Ok(deleted)
    }

    async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        Ok(self.lock().locations.clone())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut state = self.lock();
        if state.users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }
        if state.users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let id = state.next_id();
        let user = User::new(id, input.username, input.email, Utc::now())?;
        state.users.push(UserCredentials {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.username == username)
            .cloned())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, DomainError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|c| c.user.id == id)
            .map(|c| c.user.clone()))
    }

    async fn update_profile(
        &self,
        id: i64,
        patch: ProfilePatch,
    ) -> Result<Option<User>, DomainError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|c| c.user.email == patch.email && c.user.id != id)
        {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        let Some(creds) = state.users.iter_mut().find(|c| c.user.id == id) else {
            return Ok(None);
        };
        creds.user.first_name = patch.first_name;
        creds.user.last_name = patch.last_name;
        creds.user.email = patch.email;
        Ok(Some(creds.user.clone()))
    }
}
