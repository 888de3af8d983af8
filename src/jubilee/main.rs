use chrono::Utc;
use clap::Parser;
use colored::*;
use jubilee::config::{EmailConfig, RemoteConfig};
use jubilee::error::{BlogError, Result};
use jubilee::model::{Comment, Mood, Post};
use jubilee::notify::NotificationDispatcher;
use jubilee::quotes;
use jubilee::remote::{HttpRemote, RemoteStore};
use jubilee::repo::BlogRepository;
use jubilee::store::fs::FileStore;
use jubilee::users::UserRegistry;
use uuid::Uuid;

mod args;
use args::{Cli, Commands, SubscribeState};

fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jubilee=warn".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    repo: BlogRepository<FileStore>,
    registry: UserRegistry<FileStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Quote and countdown are pure; no stores involved.
    match &cli.command {
        Some(Commands::Quote) => return handle_quote(),
        Some(Commands::Countdown) => return handle_countdown(),
        _ => {}
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Post {
            title,
            content,
            author,
            tags,
            mood,
        }) => handle_post(&mut ctx, title, content, author, tags, mood),
        Some(Commands::List) | None => handle_list(&ctx),
        Some(Commands::Show { index }) => handle_show(&ctx, index),
        Some(Commands::Comment {
            index,
            content,
            author,
        }) => handle_comment(&mut ctx, index, content, author),
        Some(Commands::Like { index, comment }) => handle_like(&mut ctx, index, comment),
        Some(Commands::Delete { index }) => handle_delete(&mut ctx, index),
        Some(Commands::Register {
            name,
            email,
            no_subscribe,
        }) => handle_register(&mut ctx, name, email, !no_subscribe),
        Some(Commands::Subscribe { state }) => handle_subscribe(&mut ctx, state),
        Some(Commands::Quote) | Some(Commands::Countdown) => unreachable!("handled above"),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let root = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => FileStore::default_root()?,
    };

    let remote: Option<Box<dyn RemoteStore>> = match RemoteConfig::from_env() {
        Some(config) => match HttpRemote::new(&config) {
            Ok(adapter) => Some(Box::new(adapter)),
            Err(err) => {
                tracing::warn!(error = %err, "remote adapter unavailable, running local-only");
                None
            }
        },
        None => None,
    };
    let dispatcher = NotificationDispatcher::new(EmailConfig::from_env());

    let repo = BlogRepository::open(FileStore::new(root.clone()), remote, dispatcher)?;
    let registry = UserRegistry::open(FileStore::new(root))?;

    Ok(AppContext { repo, registry })
}

fn handle_post(
    ctx: &mut AppContext,
    title: String,
    content: String,
    author: Option<String>,
    tags: Vec<String>,
    mood: Option<Mood>,
) -> Result<()> {
    let author = author
        .or_else(|| ctx.registry.current().map(|u| u.name.clone()))
        .unwrap_or_default();

    let post = ctx.repo.create_post(&author, &title, &content, tags, mood)?;
    println!(
        "{} {} {}",
        "Published:".green().bold(),
        post.title.bold(),
        format!("by {}", post.author).dimmed()
    );
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let posts = ctx.repo.posts();
    if posts.is_empty() {
        println!(
            "No posts yet. Try: jubilee post \"Title\" \"Something worth celebrating\""
        );
        return Ok(());
    }

    for (i, post) in posts.iter().enumerate() {
        print_post_line(ctx, i + 1, post);
    }
    Ok(())
}

fn handle_show(ctx: &AppContext, index: usize) -> Result<()> {
    let post_id = resolve_post(ctx, index)?;
    let post = ctx
        .repo
        .post(post_id)
        .ok_or_else(|| BlogError::Api(format!("No such post: {}", index)))?;

    println!("{}", post.title.bold());
    println!(
        "{}",
        format!("by {} · {}", post.author, age_of(post.timestamp)).dimmed()
    );
    if let Some(mood) = post.mood {
        println!("{}", format!("feeling {}", mood).italic());
    }
    if !post.tags.is_empty() {
        println!("{}", format!("#{}", post.tags.join(" #")).cyan());
    }
    println!();
    println!("{}", post.content);
    println!();
    println!("{}", format!("♥ {}", post.likes).red());

    let comments = ctx.repo.post_comments(post_id);
    if comments.is_empty() {
        println!("{}", "No comments yet.".dimmed());
    } else {
        println!();
        for (i, comment) in comments.iter().enumerate() {
            print_comment_line(i + 1, comment);
        }
    }
    Ok(())
}

fn handle_comment(
    ctx: &mut AppContext,
    index: usize,
    content: String,
    author: Option<String>,
) -> Result<()> {
    let post_id = resolve_post(ctx, index)?;
    let author = author
        .or_else(|| ctx.registry.current().map(|u| u.name.clone()))
        .unwrap_or_default();

    let comment = ctx.repo.add_comment(post_id, &author, &content)?;
    println!(
        "{} {}",
        "Commented:".green().bold(),
        format!("as {}", comment.author).dimmed()
    );
    Ok(())
}

fn handle_like(ctx: &mut AppContext, index: usize, comment: Option<usize>) -> Result<()> {
    let post_id = resolve_post(ctx, index)?;
    let viewer = ctx.repo.viewer_id().to_string();

    match comment {
        Some(n) => {
            let comment_id = resolve_comment(ctx, post_id, n)?;
            ctx.repo.toggle_comment_like(comment_id, &viewer)?;
            println!("{}", "Comment like toggled.".green());
        }
        None => {
            ctx.repo.toggle_post_like(post_id, &viewer)?;
            let likes = ctx.repo.post(post_id).map(|p| p.likes).unwrap_or(0);
            println!("{} {}", "Like toggled.".green(), format!("♥ {}", likes).red());
        }
    }
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, index: usize) -> Result<()> {
    let post_id = resolve_post(ctx, index)?;
    let title = ctx
        .repo
        .post(post_id)
        .map(|p| p.title.clone())
        .unwrap_or_default();
    ctx.repo.delete_post(post_id)?;
    println!("{} {}", "Deleted:".yellow().bold(), title);
    Ok(())
}

fn handle_register(
    ctx: &mut AppContext,
    name: String,
    email: String,
    subscribe: bool,
) -> Result<()> {
    let user = ctx.registry.register(&name, &email, subscribe)?;
    println!(
        "{} {} {}",
        "Registered:".green().bold(),
        user.name,
        format!("<{}>", user.email).dimmed()
    );
    if user.is_subscribed {
        println!("You will be notified about new posts.");
    }
    Ok(())
}

fn handle_subscribe(ctx: &mut AppContext, state: SubscribeState) -> Result<()> {
    if ctx.registry.current().is_none() {
        return Err(BlogError::Api(
            "No registered user. Run `jubilee register --name ... --email ...` first".to_string(),
        ));
    }
    let subscribed = matches!(state, SubscribeState::On);
    ctx.registry.set_subscription(subscribed)?;
    if subscribed {
        println!("Notifications {}.", "on".green());
    } else {
        println!("Notifications {}.", "off".yellow());
    }
    Ok(())
}

fn handle_quote() -> Result<()> {
    let today = Utc::now().date_naive();
    println!("{}", quotes::daily_quote(today).italic());
    Ok(())
}

fn handle_countdown() -> Result<()> {
    let today = Utc::now().date_naive();
    let days = quotes::days_until_celebration(today);
    if days == 0 {
        println!("{}", "It's today! Happy July 12th! 🎉".bold());
    } else {
        println!(
            "{} {}",
            format!("{} days", days).bold(),
            format!("until {}", quotes::celebration_date(today)).dimmed()
        );
    }
    Ok(())
}

/// Map a 1-based list position (newest first) to a post id.
fn resolve_post(ctx: &AppContext, index: usize) -> Result<Uuid> {
    let posts = ctx.repo.posts();
    index
        .checked_sub(1)
        .and_then(|i| posts.get(i))
        .map(|p| p.id)
        .ok_or_else(|| BlogError::Api(format!("No such post: {}", index)))
}

/// Map a 1-based comment position (newest first) within a post to its id.
fn resolve_comment(ctx: &AppContext, post_id: Uuid, index: usize) -> Result<Uuid> {
    let comments = ctx.repo.post_comments(post_id);
    index
        .checked_sub(1)
        .and_then(|i| comments.get(i))
        .map(|c| c.id)
        .ok_or_else(|| BlogError::Api(format!("No such comment: {}", index)))
}

fn print_post_line(ctx: &AppContext, index: usize, post: &Post) {
    let comments = ctx.repo.post_comments(post.id).len();
    let mut extras = vec![format!("♥ {}", post.likes)];
    if comments > 0 {
        extras.push(format!("{} comments", comments));
    }
    if let Some(mood) = post.mood {
        extras.push(format!("feeling {}", mood));
    }

    println!(
        "{:>3}  {}  {}",
        index.to_string().cyan(),
        post.title.bold(),
        format!(
            "by {} · {} · {}",
            post.author,
            age_of(post.timestamp),
            extras.join(" · ")
        )
        .dimmed()
    );
}

fn print_comment_line(index: usize, comment: &Comment) {
    println!(
        "{:>3}  {}  {}",
        format!("c{}", index).cyan(),
        comment.content,
        format!(
            "by {} · {} · ♥ {}",
            comment.author,
            age_of(comment.timestamp),
            comment.likes
        )
        .dimmed()
    );
}

fn age_of(timestamp: chrono::DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}
