//! Seed script for development — populates a Directus instance with sample users, books and comments.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DIRECTUS_URL` (reads .env). `SEED_USERS` sets the number of users
//! (default 20) and `SEED_DELAY_MS` the pause between books (default 1000).

use std::time::Duration;

use anyhow::Context;
use bookshelf::gateway::directus::Registration;
use bookshelf::gateway::{CollectionGateway, DirectusGateway, GatewayError};
use bookshelf::models::book::{CreateBook, BOOKS_COLLECTION};
use bookshelf::models::comment::COMMENTS_COLLECTION;
use chrono::{Duration as Span, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use uuid::Uuid;

const PASSWORD: &str = "Password123!";

const FIRST_NAMES: &[&str] = &[
    "Ada", "Kai", "Lena", "Omar", "Priya", "Tomas", "Yuki", "Zoe", "Marta", "Felix",
];
const LAST_NAMES: &[&str] = &[
    "Lovelace", "Nakamura", "Okafor", "Silva", "Novak", "Larsen", "Haddad", "Moreau",
];
const GENRES: &[&str] = &[
    "Fantasy", "Sci-Fi", "Mystery", "Romance", "Horror", "History", "Poetry", "Thriller",
];
const TITLE_WORDS: &[&str] = &[
    "Silent", "River", "Empire", "Glass", "Winter", "Shadow", "Garden", "Machine", "Last",
    "Crimson", "Harbor", "Echo",
];
const SENTENCES: &[&str] = &[
    "Could not put it down.",
    "The ending surprised me.",
    "Slow start but worth it.",
    "Beautifully written.",
    "Not my favourite, but the characters are great.",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let directus_url = std::env::var("DIRECTUS_URL").context("DIRECTUS_URL must be set")?;
    let total_users: usize = std::env::var("SEED_USERS")
        .unwrap_or_else(|_| "20".to_string())
        .parse()
        .unwrap_or(20);
    let delay = Duration::from_millis(
        std::env::var("SEED_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .unwrap_or(1000),
    );

    let directus = DirectusGateway::new(&directus_url, Duration::from_secs(60))?;

    println!("=== Bookshelf Seed Script ===");
    println!("Seeding {total_users} users into {}", directus.base_url());

    for i in 1..=total_users {
        match seed_user(&directus, delay).await {
            Ok(email) => println!("[done] [{i}/{total_users}] Seeded {email}"),
            Err(e) => {
                if let Some(GatewayError::Status { status: 429, .. }) =
                    e.downcast_ref::<GatewayError>()
                {
                    eprintln!(
                        "Rate limit hit. Set RATE_LIMITER_ENABLED=false on the Directus instance and retry."
                    );
                }
                return Err(e.context(format!("Seeding user {i} failed")));
            }
        }
    }

    println!("\n=== Seed complete! ===");
    println!("Every seeded user logs in with password {PASSWORD}");

    Ok(())
}

async fn seed_user(directus: &DirectusGateway, delay: Duration) -> anyhow::Result<String> {
    let registration = random_registration();
    directus.register_user(&registration).await?;
    let tokens = directus.login(&registration.email, PASSWORD).await?;
    let session = directus.with_token(tokens.access_token);

    let book_count = rand::thread_rng().gen_range(2..=4);
    for _ in 0..book_count {
        let book = random_book();
        let created = session
            .create(BOOKS_COLLECTION, &serde_json::to_value(&book)?)
            .await?;

        if book.allow_comments {
            let book_id = created
                .get("id")
                .cloned()
                .context("Created book has no id")?;
            let comment_count = rand::thread_rng().gen_range(1..=3);
            for _ in 0..comment_count {
                let comment = random_comment(&book_id);
                session.create(COMMENTS_COLLECTION, &comment).await?;
            }
        }
        tokio::time::sleep(delay).await;
    }

    Ok(registration.email)
}

fn pick(options: &[&'static str]) -> &'static str {
    options.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

fn random_registration() -> Registration {
    let first_name = pick(FIRST_NAMES).to_string();
    let last_name = pick(LAST_NAMES).to_string();
    let suffix = Uuid::new_v4().simple().to_string();
    Registration {
        email: format!(
            "{}.{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            &suffix[..8]
        ),
        password: PASSWORD.to_string(),
        first_name,
        last_name,
    }
}

fn random_book() -> CreateBook {
    let mut rng = rand::thread_rng();
    CreateBook {
        title: format!("The {} {}", pick(TITLE_WORDS), pick(TITLE_WORDS)),
        author: format!("{} {}", pick(FIRST_NAMES), pick(LAST_NAMES)),
        genre: pick(GENRES).to_string(),
        publication_date: random_date_since(2010).to_string(),
        cover_photo: None,
        allow_comments: rng.gen_bool(0.8),
    }
}

fn random_comment(book_id: &serde_json::Value) -> serde_json::Value {
    let days_ago = rand::thread_rng().gen_range(0..30);
    json!({
        "content": pick(SENTENCES),
        "author_name": format!("{} {}", pick(FIRST_NAMES), pick(LAST_NAMES)),
        "book_id": book_id,
        "date_created": (Utc::now() - Span::days(days_ago)).to_rfc3339(),
    })
}

fn random_date_since(year: i32) -> NaiveDate {
    let today = Utc::now().date_naive();
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today);
    let span = (today - start).num_days().max(0);
    start + Span::days(rand::thread_rng().gen_range(0..=span))
}
