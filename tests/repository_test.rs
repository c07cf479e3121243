//! Repository behavior against a migrated SQLite database.

mod common;

use audiobook_api::domain::{
    AccountFilter, AuthorFilter, AuthorRequest, CategoryFilter, CategoryRequest,
    ChangePasswordRequest, RatingFilter, RatingRequest, Role, StoryFilter,
};
use audiobook_api::errors::AppError;
use audiobook_api::infra::UnitOfWork;
use audiobook_api::types::Pagination;

use common::{account_request, audio_request, story_request, TestContext, BASE_URL};

fn author(name: &str) -> AuthorRequest {
    AuthorRequest {
        id: None,
        author_name: name.to_string(),
    }
}

fn rating(account_id: i32, story_id: i32, value: i32) -> RatingRequest {
    RatingRequest {
        id: None,
        account_id,
        story_id,
        rating_value: value,
        comment: Some(format!("{} stars", value)),
    }
}

#[tokio::test]
async fn test_author_lifecycle_with_soft_delete() {
    let ctx = TestContext::new().await;
    let authors = ctx.uow.authors();

    let created = authors.add(author("Isaac Asimov")).await.unwrap();
    assert_eq!(created.author_name, "Isaac Asimov");
    assert_eq!(created.total_stories, 0);
    assert!(created.deleted_at.is_none());

    let updated = authors
        .update(created.id, author("Isaac Asimov (ed.)"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.author_name, "Isaac Asimov (ed.)");
    assert!(updated.updated_at >= created.updated_at);

    authors.soft_delete(created.id).await.unwrap();
    assert!(authors.get_by_id(created.id).await.unwrap().is_none());
    assert!(authors
        .update(created.id, author("Ghost"))
        .await
        .unwrap()
        .is_none());
    assert!(matches!(
        authors.soft_delete(created.id).await,
        Err(AppError::NotFound)
    ));

    // Hard delete still reaches soft-deleted rows
    authors.delete(created.id).await.unwrap();
    assert!(matches!(authors.delete(created.id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_pagination_and_case_insensitive_search() {
    let ctx = TestContext::new().await;
    let categories = ctx.uow.categories();

    for i in 1..=12 {
        categories
            .add(CategoryRequest {
                id: None,
                category_name: format!("Genre {:02}", i),
            })
            .await
            .unwrap();
    }
    categories
        .add(CategoryRequest {
            id: None,
            category_name: "Mystery".to_string(),
        })
        .await
        .unwrap();

    let page = categories
        .get_paginated(Pagination::new(2, 5), CategoryFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 13);
    assert_eq!(page.page_number, 2);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.items[0].category_name, "Genre 06");

    let last = categories
        .get_paginated(Pagination::new(3, 5), CategoryFilter::default())
        .await
        .unwrap();
    assert_eq!(last.items.len(), 3);

    let found = categories
        .get_paginated(
            Pagination::default(),
            CategoryFilter {
                search: Some("  MYST ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].category_name, "Mystery");
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let ctx = TestContext::new().await;
    let authors = ctx.uow.authors();
    authors.add(author("Frank Herbert")).await.unwrap();

    let page = authors
        .get_paginated(Pagination::new(i64::MAX, 3), AuthorFilter::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 1);
    assert_eq!(page.page_size, 3);

    let page = authors
        .get_paginated(Pagination::new(1, 10_000), AuthorFilter::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page_size, 100);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let ctx = TestContext::new().await;
    let authors = ctx.uow.authors();
    authors.add(author("100% Fiction")).await.unwrap();
    authors.add(author("1000 Tales")).await.unwrap();

    let found = authors
        .get_paginated(
            Pagination::default(),
            AuthorFilter {
                search: Some("0%".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].author_name, "100% Fiction");
}

#[tokio::test]
async fn test_story_response_aggregates_relations() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;

    let story = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", Some(ctx.png().await)))
        .await
        .unwrap();
    assert_eq!(story.author_name, "Frank Herbert");
    assert_eq!(story.category_name, "Science Fiction");
    assert_eq!(story.narrator_name, "Scott Brick");
    assert_eq!(story.listeners_count, 0);
    assert_eq!(story.total_audios, 0);
    assert_eq!(story.average_rating, 0.0);

    let cover_url = story.cover_image_url.clone().unwrap();
    assert!(cover_url.starts_with(&format!("{}/coverImages/", BASE_URL)));
    assert!(cover_url.ends_with(".png"));
    assert!(ctx.blob_exists(TestContext::blob_path_from_url(&cover_url)));

    let audio = ctx
        .uow
        .audios()
        .add(audio_request(story.id, "Chapter 1", Some(ctx.mp3().await)))
        .await
        .unwrap();
    let extra = ctx
        .uow
        .audios()
        .add(audio_request(story.id, "Chapter 2", Some(ctx.mp3().await)))
        .await
        .unwrap();
    ctx.uow.audios().soft_delete(extra.id).await.unwrap();
    assert_eq!(audio.story_title, "Dune");

    let alice = ctx.account("alice").await;
    let bob = ctx.account("bob").await;
    ctx.uow.ratings().add(rating(alice, story.id, 4)).await.unwrap();
    ctx.uow.ratings().add(rating(bob, story.id, 5)).await.unwrap();

    let story = ctx.uow.stories().get_by_id(story.id).await.unwrap().unwrap();
    assert_eq!(story.total_audios, 1);
    assert_eq!(story.average_rating, 4.5);

    let author = ctx.uow.authors().get_by_id(ids.0).await.unwrap().unwrap();
    assert_eq!(author.total_stories, 1);
}

#[tokio::test]
async fn test_story_filters() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;
    let other_author = ctx.uow.authors().add(author("Ursula K. Le Guin")).await.unwrap();

    ctx.uow
        .stories()
        .add(story_request(ids, "Dune", None))
        .await
        .unwrap();
    ctx.uow
        .stories()
        .add(story_request((other_author.id, ids.1, ids.2), "The Dispossessed", None))
        .await
        .unwrap();

    let by_author = ctx
        .uow
        .stories()
        .get_paginated(
            Pagination::default(),
            StoryFilter {
                author_id: Some(other_author.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_author.total_count, 1);
    assert_eq!(by_author.items[0].title, "The Dispossessed");

    // Matches the description as well as the title
    let by_text = ctx
        .uow
        .stories()
        .get_paginated(
            Pagination::default(),
            StoryFilter {
                search_query: Some("dune DESCRIPTION".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_text.total_count, 1);
    assert_eq!(by_text.items[0].title, "Dune");
    assert!(by_text.items[0].cover_image_url.is_none());
}

#[tokio::test]
async fn test_story_update_replaces_cover() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;
    let stories = ctx.uow.stories();

    let story = stories
        .add(story_request(ids, "Dune", Some(ctx.png().await)))
        .await
        .unwrap();
    let old_cover = story.cover_image_url.clone().unwrap();

    // No new file keeps the current cover
    let kept = stories
        .update(story.id, story_request(ids, "Dune Messiah", None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.title, "Dune Messiah");
    assert_eq!(kept.cover_image_url.as_deref(), Some(old_cover.as_str()));

    let replaced = stories
        .update(story.id, story_request(ids, "Dune Messiah", Some(ctx.png().await)))
        .await
        .unwrap()
        .unwrap();
    let new_cover = replaced.cover_image_url.unwrap();
    assert_ne!(new_cover, old_cover);
    assert!(ctx.blob_exists(TestContext::blob_path_from_url(&new_cover)));
    assert!(!ctx.blob_exists(TestContext::blob_path_from_url(&old_cover)));
    assert_eq!(ctx.staged_uploads(), 0);
}

#[tokio::test]
async fn test_story_with_unknown_author_is_rejected() {
    let ctx = TestContext::new().await;
    let (_, category_id, narrator_id) = ctx.catalog().await;

    let result = ctx
        .uow
        .stories()
        .add(story_request((9999, category_id, narrator_id), "Orphan", Some(ctx.png().await)))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    // neither the stored cover nor the staged upload survives
    let covers = std::fs::read_dir(ctx.storage_root().join("coverImages"))
        .map(|d| d.count())
        .unwrap_or(0);
    assert_eq!(covers, 0);
    assert_eq!(ctx.staged_uploads(), 0);
}

#[tokio::test]
async fn test_story_delete_cascades_to_audio_and_blobs() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;

    let story = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", Some(ctx.png().await)))
        .await
        .unwrap();
    let audio = ctx
        .uow
        .audios()
        .add(audio_request(story.id, "Chapter 1", Some(ctx.mp3().await)))
        .await
        .unwrap();
    let cover = story.cover_image_url.unwrap();

    ctx.uow.stories().delete(story.id).await.unwrap();

    assert!(ctx.uow.stories().get_by_id(story.id).await.unwrap().is_none());
    assert!(ctx.uow.audios().get_by_id(audio.id).await.unwrap().is_none());
    assert!(!ctx.blob_exists(TestContext::blob_path_from_url(&cover)));
    assert!(!ctx.blob_exists(TestContext::blob_path_from_url(&audio.audio_file_url)));
}

#[tokio::test]
async fn test_author_delete_removes_story_blobs() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;

    let story = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", Some(ctx.png().await)))
        .await
        .unwrap();
    let cover = story.cover_image_url.unwrap();

    ctx.uow.authors().delete(ids.0).await.unwrap();

    assert!(ctx.uow.stories().get_by_id(story.id).await.unwrap().is_none());
    assert!(!ctx.blob_exists(TestContext::blob_path_from_url(&cover)));
    // Category and narrator are untouched
    assert!(ctx.uow.categories().get_by_id(ids.1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_audio_requires_file_on_add() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;
    let story = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", None))
        .await
        .unwrap();

    let result = ctx
        .uow
        .audios()
        .add(audio_request(story.id, "Chapter 1", None))
        .await;

    match result {
        Err(AppError::Validation(errors)) => {
            assert_eq!(errors, vec!["Audio file is required.".to_string()]);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_audio_delete_removes_file() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;
    let story = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", None))
        .await
        .unwrap();
    let audio = ctx
        .uow
        .audios()
        .add(audio_request(story.id, "Chapter 1", Some(ctx.mp3().await)))
        .await
        .unwrap();
    let path = TestContext::blob_path_from_url(&audio.audio_file_url).to_string();
    assert!(path.starts_with("/audio/"));
    assert!(ctx.blob_exists(&path));

    ctx.uow.audios().delete(audio.id).await.unwrap();

    assert!(!ctx.blob_exists(&path));
    assert!(matches!(
        ctx.uow.audios().delete(audio.id).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_rating_filters_and_names() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;
    let dune = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", None))
        .await
        .unwrap();
    let messiah = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune Messiah", None))
        .await
        .unwrap();
    let alice = ctx.account("alice").await;

    ctx.uow.ratings().add(rating(alice, dune.id, 5)).await.unwrap();
    ctx.uow.ratings().add(rating(alice, messiah.id, 3)).await.unwrap();

    let page = ctx
        .uow
        .ratings()
        .get_paginated(
            Pagination::default(),
            RatingFilter {
                story_id: Some(messiah.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].username, "alice");
    assert_eq!(page.items[0].story_title, "Dune Messiah");
    assert_eq!(page.items[0].rating_value, 3);
}

#[tokio::test]
async fn test_account_email_is_unique() {
    let ctx = TestContext::new().await;
    let accounts = ctx.uow.accounts();

    let alice = accounts
        .add(account_request("alice", "secret-pass"))
        .await
        .unwrap();
    assert_eq!(alice.role, Role::User);

    let duplicate = accounts.add(account_request("alice", "other-pass")).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // Updating an account with its own email is fine
    let mut request = account_request("alice", "secret-pass");
    request.role = Role::Admin;
    let updated = accounts.update(alice.id, request).await.unwrap().unwrap();
    assert_eq!(updated.role, Role::Admin);

    let admins = accounts
        .get_paginated(
            Pagination::default(),
            AccountFilter {
                role: Some(Role::Admin),
                search: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(admins.total_count, 1);
}

#[tokio::test]
async fn test_change_password_verifies_current() {
    let ctx = TestContext::new().await;
    let accounts = ctx.uow.accounts();
    let id = ctx.account("alice").await;

    let change = |current: &str, new: &str| ChangePasswordRequest {
        current_password: current.to_string(),
        new_password: new.to_string(),
        confirm_password: new.to_string(),
    };

    assert!(matches!(
        accounts.change_password(id, change("wrong-pass", "new-secret")).await,
        Err(AppError::Validation(_))
    ));
    accounts
        .change_password(id, change("secret-pass", "new-secret"))
        .await
        .unwrap();

    // The old password no longer verifies
    assert!(matches!(
        accounts.change_password(id, change("secret-pass", "another")).await,
        Err(AppError::Validation(_))
    ));
    accounts
        .change_password(id, change("new-secret", "another"))
        .await
        .unwrap();

    assert!(matches!(
        accounts.change_password(9999, change("x", "another")).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_ping() {
    let ctx = TestContext::new().await;
    ctx.uow.ping().await.unwrap();
}

#[tokio::test]
async fn test_soft_delete_keeps_blobs() {
    let ctx = TestContext::new().await;
    let ids = ctx.catalog().await;
    let story = ctx
        .uow
        .stories()
        .add(story_request(ids, "Dune", Some(ctx.png().await)))
        .await
        .unwrap();
    let cover = story.cover_image_url.unwrap();

    ctx.uow.stories().soft_delete(story.id).await.unwrap();

    assert!(ctx.blob_exists(TestContext::blob_path_from_url(&cover)));
    let page = ctx
        .uow
        .stories()
        .get_paginated(Pagination::default(), StoryFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);

    // Soft-deleted stories no longer count towards their author
    let author = ctx.uow.authors().get_by_id(ids.0).await.unwrap().unwrap();
    assert_eq!(author.total_stories, 0);
}
