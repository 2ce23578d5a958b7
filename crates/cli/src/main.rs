use anyhow::{anyhow, Context, Result};
use catalog::MovieId;
use clap::{Parser, Subcommand};
use colored::Colorize;
use recommender::{parse_genre_list, Recommender, RecommenderConfig, ScoredMovie};
use sources::Emotion;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// movie-recs - Content-based movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendations by title similarity or by mood", long_about = None)]
struct Cli {
    /// Path to the movie table (.csv, .json array or .jsonl)
    #[arg(short, long, env = "MOVIES_FILE", default_value = "data/movies_metadata.csv")]
    movies_file: PathBuf,

    /// Optional JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fuzzy search for movies by title
    Search {
        /// Title to search for (typos allowed)
        #[arg(long)]
        title: String,
    },

    /// Movies similar to a title
    Similar {
        #[arg(long)]
        title: String,

        /// Number of recommendations (default from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Minimum similarity score in [0, 1] (default from config)
        #[arg(long)]
        min_score: Option<f32>,

        /// Show the score breakdown for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Movies for an emotion (joy, anger, sadness, fear or French labels)
    Emotion {
        #[arg(long)]
        emotion: String,

        #[arg(long)]
        limit: Option<usize>,

        /// Minimum rating on a 0-10 scale (default from config)
        #[arg(long)]
        min_rating: Option<f32>,
    },

    /// Best-rated movies in any of a comma-separated list of genres
    Genre {
        #[arg(long)]
        genres: String,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        min_rating: Option<f32>,
    },

    /// List accepted emotion labels and their genres
    Emotions,

    /// Show one movie
    Info {
        #[arg(long)]
        id: MovieId,
    },

    /// Show catalog statistics
    Stats,

    /// Time similarity queries over the first N catalog movies
    Benchmark {
        /// Number of queries to run
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = RecommenderConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    // Emotion labels don't need the catalog
    if let Commands::Emotions = cli.command {
        handle_emotions();
        return Ok(());
    }

    println!("Loading movies from {}...", cli.movies_file.display());
    let start = Instant::now();
    let recommender = Recommender::from_file(&cli.movies_file, config)
        .with_context(|| format!("Failed to load movies from {}", cli.movies_file.display()))?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        recommender.catalog().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Search { title } => handle_search(&recommender, &title),
        Commands::Similar {
            title,
            limit,
            min_score,
            explain,
        } => handle_similar(&recommender, &title, limit, min_score, explain)?,
        Commands::Emotion {
            emotion,
            limit,
            min_rating,
        } => handle_emotion(&recommender, &emotion, limit, min_rating)?,
        Commands::Genre {
            genres,
            limit,
            min_rating,
        } => handle_genre(&recommender, &genres, limit, min_rating)?,
        Commands::Emotions => handle_emotions(),
        Commands::Info { id } => handle_info(&recommender, id)?,
        Commands::Stats => handle_stats(&recommender),
        Commands::Benchmark { requests } => handle_benchmark(&recommender, requests)?,
    }

    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str) {
    let matches = recommender.find(title);
    if matches.is_empty() {
        println!("{}", format!("No movies found for '{}'", title).yellow());
        return;
    }

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    for movie in &matches {
        println!(
            "{}: {} ({}) [{}] - match {:.0}%",
            movie.movie.id.to_string().green(),
            movie.movie.title,
            year_label(movie.movie.year),
            movie.movie.genres_label(),
            movie.percent()
        );
    }
}

/// Handle the 'similar' command
fn handle_similar(
    recommender: &Recommender,
    title: &str,
    limit: Option<usize>,
    min_score: Option<f32>,
    explain: bool,
) -> Result<()> {
    let config = recommender.config();
    let n = limit.unwrap_or(config.n_recommendations);
    let min_score = min_score.unwrap_or(config.min_similarity_score);

    let Some(similar) = recommender.recommend_similar(title, n, min_score)? else {
        println!("{}", format!("No movie title close enough to '{}'", title).yellow());
        return Ok(());
    };

    println!(
        "Matched {} ({:.0}%)",
        similar.matched.movie.title.bold(),
        similar.matched.percent()
    );
    print_recommendations(
        &format!("Movies similar to {}:", similar.matched.movie.title),
        &similar.recommendations,
        explain,
    );
    Ok(())
}

/// Handle the 'emotion' command
fn handle_emotion(
    recommender: &Recommender,
    emotion: &str,
    limit: Option<usize>,
    min_rating: Option<f32>,
) -> Result<()> {
    let config = recommender.config();
    let n = limit.unwrap_or(config.n_recommendations);
    let min_rating = min_rating.unwrap_or(config.min_rating);

    let parsed = Emotion::parse(emotion)?;
    println!("Emotion '{}' maps to: {}", emotion, parsed.genres().join(", "));

    let recommendations = recommender.recommend_emotion(parsed, n, min_rating)?;
    print_recommendations(&format!("Movies for {}:", parsed), &recommendations, true);
    Ok(())
}

/// Handle the 'genre' command
fn handle_genre(
    recommender: &Recommender,
    genres: &str,
    limit: Option<usize>,
    min_rating: Option<f32>,
) -> Result<()> {
    let config = recommender.config();
    let n = limit.unwrap_or(config.n_recommendations);
    let min_rating = min_rating.unwrap_or(config.min_rating);

    let genres = parse_genre_list(genres);
    if genres.is_empty() {
        return Err(anyhow!("No genres given"));
    }
    let title = format!(
        "Best movies in {}:",
        genres.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    );

    let recommendations = recommender.recommend_by_genres(genres, n, min_rating)?;
    print_recommendations(&title, &recommendations, false);
    Ok(())
}

/// Handle the 'emotions' command
fn handle_emotions() {
    println!("{}", "Available emotions:".bold().blue());
    for label in sources::available_emotions() {
        if let Ok(emotion) = Emotion::parse(label) {
            println!("  {} -> {}", label.green(), emotion.genres().join(", "));
        }
    }
}

/// Handle the 'info' command
fn handle_info(recommender: &Recommender, id: MovieId) -> Result<()> {
    let movie = recommender
        .catalog()
        .get(id)
        .ok_or_else(|| anyhow!("Movie {} not found", id))?;

    println!("{}", format!("{} ({})", movie.title, year_label(movie.year)).bold().blue());
    println!("{}ID: {}", "• ".green(), movie.id);
    println!("{}Genres: {}", "• ".green(), movie.genres_label());
    println!("{}Rating: {:.1} ({} votes)", "• ".cyan(), movie.rating, movie.vote_count);
    println!("{}Popularity: {:.1}", "• ".cyan(), movie.popularity);
    println!("{}", movie.overview);
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(recommender: &Recommender) {
    let stats = recommender.catalog().stats();
    println!("{}", "Catalog statistics:".bold().blue());
    println!("{}Movies: {}", "• ".green(), stats.movies);
    println!("{}Genres: {}", "• ".green(), stats.genres);
    println!("{}Average rating: {:.2}", "• ".cyan(), stats.avg_rating);
    println!("{}Average popularity: {:.2}", "• ".cyan(), stats.avg_popularity);
    println!("{}Vocabulary terms: {}", "• ".cyan(), stats.vocabulary_size);
}

/// Handle the 'benchmark' command
fn handle_benchmark(recommender: &Recommender, requests: usize) -> Result<()> {
    let config = recommender.config();
    let anchors: Vec<MovieId> = recommender.catalog().ids().take(requests).collect();
    if anchors.is_empty() {
        return Err(anyhow!("No movies to benchmark"));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(anchors.len());
    for anchor in &anchors {
        let start = Instant::now();
        recommender.rank(*anchor, config.n_recommendations, config.min_similarity_score)?;
        timings.push(start.elapsed());
    }

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / timings.len() as u32;
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f32 / total_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Queries: {}", timings.len());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.5));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} queries/second", throughput);
    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(header: &str, recommendations: &[ScoredMovie], explain: bool) {
    println!("{}", header.bold().blue());
    if recommendations.is_empty() {
        println!("{}", "  No recommendations".yellow());
        return;
    }

    for (idx, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}] - Score: {:.1}%",
            (idx + 1).to_string().green(),
            rec.movie.title,
            year_label(rec.movie.year),
            rec.movie.genres_label(),
            rec.percent()
        );
        if explain {
            println!("   {}", rec.explanation);
        }
    }
}

fn year_label(year: Option<u16>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string())
}
