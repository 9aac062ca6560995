//! Posts command - optimistic create, update and delete

use crate::cli::args::{PostsAction, PostsArgs, UpsertArgs};
use crate::client::{DashboardClient, POSTS};
use crate::domain::{Post, PostDraft};
use crate::error::{SyncacheError, SyncacheResult};
use crate::store::{CacheStore, Subscription};
use crate::ui::{self, TaskSpinner, UiContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Execute the posts command
pub async fn execute(args: PostsArgs, client: &DashboardClient) -> SyncacheResult<()> {
    match args.action {
        PostsAction::Upsert(args) => upsert(args, client).await,
        PostsAction::Delete { id, yes } => delete(&id, yes, client).await,
    }
}

async fn upsert(args: UpsertArgs, client: &DashboardClient) -> SyncacheResult<()> {
    let ctx = UiContext::detect();

    let posts = client.load_posts().await?;
    let companies = client.load_companies().await?;
    if !companies.iter().any(|company| company.id == args.company) {
        return Err(SyncacheError::User(format!(
            "Unknown company: {} (see: syncache fetch companies)",
            args.company
        )));
    }

    let created_at = match &args.id {
        Some(id) => Some(find_post(&posts, id)?.created_at),
        None => None,
    };

    let draft = PostDraft {
        id: args.id,
        title: args.title,
        resource_uid: args.company,
        date_time: args.month,
        content: args.content,
        author: args.author,
        created_at,
    };
    let action = if draft.id.is_some() { "Updating" } else { "Creating" };

    let (changes, _subscription) = track_changes(client.posts());
    let mutations = client.post_mutations();

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("{} post...", action));
    match mutations.upsert(draft).await {
        Ok(saved) => {
            spinner.stop(&format!("Saved post {}", saved.id));
            print_post(&ctx, &saved);
        }
        Err(e) => {
            spinner.stop_error("Save failed, local changes rolled back");
            return Err(e);
        }
    }

    debug!("Posts store changed {} time(s)", changes.load(Ordering::Relaxed));
    print_count(&ctx, client);
    Ok(())
}

async fn delete(id: &str, yes: bool, client: &DashboardClient) -> SyncacheResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);

    let posts = client.load_posts().await?;
    let post = find_post(&posts, id)?;

    if !ui::confirm(&ctx, &format!("Delete post \"{}\"?", post.title), false).await? {
        ui::step_info(&ctx, "Delete cancelled");
        return Ok(());
    }

    let (changes, _subscription) = track_changes(client.posts());
    let mutations = client.post_mutations();

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Deleting post {}...", id));
    match mutations.delete(id).await {
        Ok(()) => spinner.stop(&format!("Deleted post {}", id)),
        Err(e) => {
            spinner.stop_error("Delete failed, post restored");
            return Err(e);
        }
    }

    debug!("Posts store changed {} time(s)", changes.load(Ordering::Relaxed));
    print_count(&ctx, client);
    Ok(())
}

fn find_post<'a>(posts: &'a [Post], id: &str) -> SyncacheResult<&'a Post> {
    posts
        .iter()
        .find(|post| post.id == id)
        .ok_or_else(|| SyncacheError::RecordNotFound(id.to_string()))
}

/// Count store notifications for the posts key while the subscription lives
fn track_changes(store: &CacheStore<Vec<Post>>) -> (Arc<AtomicUsize>, Subscription) {
    let changes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changes);
    let reader = store.clone();
    let subscription = store.subscribe(POSTS, move || {
        counter.fetch_add(1, Ordering::Relaxed);
        let count = reader.read(POSTS).data().map_or(0, Vec::len);
        debug!("Posts changed, {} cached", count);
    });
    (changes, subscription)
}

fn print_post(ctx: &UiContext, post: &Post) {
    ui::key_value(ctx, "id", &post.id);
    ui::key_value(ctx, "title", &post.title);
    ui::key_value(ctx, "company", &post.resource_uid);
    ui::key_value(ctx, "month", &post.date_time);
    if !post.author.is_empty() {
        ui::key_value(ctx, "author", &post.author);
    }
}

fn print_count(ctx: &UiContext, client: &DashboardClient) {
    let count = client.posts().read(POSTS).data().map_or(0, Vec::len);
    ui::remark(ctx, &format!("{} post(s) cached", count));
}
