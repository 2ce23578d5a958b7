//! End-to-end scenarios over small hand-built catalogs.

use catalog::{Catalog, MovieRecord};
use recommender::{RecommendError, Recommender, RecommenderConfig};
use std::io::Write;
use std::sync::Arc;

fn sci_fi_catalog() -> Arc<Catalog> {
    let records = vec![
        MovieRecord::new(1, "The Matrix", "hacker discovers simulated reality")
            .with_genres(["Action", "SciFi"])
            .with_rating(8.7)
            .with_vote_count(20000.0),
        MovieRecord::new(2, "Blade Runner", "detective hunts rogue androids in a future city")
            .with_genres(["SciFi", "Thriller"])
            .with_rating(8.1)
            .with_vote_count(12000.0),
        MovieRecord::new(3, "Terminator", "cyborg assassin sent back from the future")
            .with_genres(["Action", "SciFi"])
            .with_rating(8.0)
            .with_vote_count(11000.0),
        MovieRecord::new(4, "Inception", "thief enters dreams to plant an idea")
            .with_genres(["Action", "SciFi", "Adventure"])
            .with_rating(8.4)
            .with_vote_count(30000.0),
        MovieRecord::new(5, "Ghost Protocol", "hacker helps agents stop a nuclear launch")
            .with_genres(["Action"])
            .with_rating(7.4)
            .with_vote_count(8000.0),
        MovieRecord::new(6, "Autumn Letters", "widow writes letters to her late husband")
            .with_genres(["Drama"])
            .with_rating(8.6)
            .with_vote_count(900.0),
        MovieRecord::new(7, "Harvest Moon", "farmers endure a long drought")
            .with_genres(["Drama", "Romance"])
            .with_rating(8.5)
            .with_vote_count(700.0),
    ];
    Arc::new(Catalog::build(records).unwrap())
}

fn build_recommender(catalog: Arc<Catalog>) -> Recommender {
    Recommender::new(catalog, RecommenderConfig::default())
}

#[test]
fn test_find_misspelled_title_first() {
    let recommender = build_recommender(sci_fi_catalog());
    let results = recommender.find("the matriks");

    assert_eq!(results[0].movie.id, 1);
    assert!(results[0].percent() >= 70.0);
}

#[test]
fn test_rank_prefers_action_sci_fi_over_drama() {
    let recommender = build_recommender(sci_fi_catalog());
    let results = recommender.rank(1, 3, 0.1).unwrap();

    assert_eq!(results.len(), 3);
    for result in &results {
        assert_ne!(result.movie.id, 1);
        assert!(
            result.movie.genres.contains("Action") || result.movie.genres.contains("SciFi"),
            "{} is not an action/sci-fi title",
            result.movie.title
        );
    }

    let all = recommender.rank(1, 10, 0.0).unwrap();
    let position = |id: u32| all.iter().position(|r| r.movie.id == id).unwrap();
    for genre_neighbour in [2, 3, 4, 5] {
        for drama in [6, 7] {
            assert!(position(genre_neighbour) < position(drama));
        }
    }
}

#[test]
fn test_rank_never_returns_anchor_or_more_than_n() {
    let catalog = sci_fi_catalog();
    let recommender = build_recommender(catalog.clone());

    for anchor in catalog.ids() {
        let results = recommender.rank(anchor, 5, 0.0).unwrap();
        assert!(results.len() <= 5);
        assert!(results.iter().all(|r| r.movie.id != anchor));
        assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.score)));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn test_rank_is_deterministic() {
    let recommender = build_recommender(sci_fi_catalog());
    let first = recommender.rank(1, 5, 0.0).unwrap();
    let second = recommender.rank(1, 5, 0.0).unwrap();

    assert_eq!(first, second);
    let bits = |r: &Vec<recommender::ScoredMovie>| {
        r.iter().map(|m| m.score.to_bits()).collect::<Vec<_>>()
    };
    assert_eq!(bits(&first), bits(&second));
}

#[test]
fn test_content_similarity_is_maximal_and_symmetric() {
    let catalog = sci_fi_catalog();
    for a in catalog.ids() {
        assert!((catalog.similarity(a, a) - 1.0).abs() < 1e-5);
        for b in catalog.ids() {
            assert_eq!(catalog.similarity(a, b), catalog.similarity(b, a));
        }
    }
}

#[test]
fn test_recommend_joy_excludes_horror() {
    let catalog = Catalog::build(vec![
        MovieRecord::new(1, "Paper Zoo", "origami animals wander a city")
            .with_genres(["Comedy", "Animation"])
            .with_rating(9.0),
        MovieRecord::new(2, "The Cellar", "something lurks beneath the house")
            .with_genres(["Horror"])
            .with_rating(9.5),
        MovieRecord::new(3, "Bad Jokes", "comedian bombs every night")
            .with_genres(["Comedy"])
            .with_rating(5.0),
    ])
    .unwrap();
    let recommender = build_recommender(Arc::new(catalog));

    let results = recommender.recommend("joy", 5, 6.0).unwrap();
    let ids: Vec<_> = results.iter().map(|r| r.movie.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn test_recommend_respects_rating_and_genre_overlap() {
    let recommender = build_recommender(sci_fi_catalog());

    for emotion in recommender.available_emotions() {
        let results = recommender.recommend(emotion, 5, 6.0).unwrap();
        let mapped = sources::Emotion::parse(emotion).unwrap().genre_set();
        for result in results {
            assert!(result.movie.rating >= 6.0);
            assert!(result.movie.genres.iter().any(|g| mapped.contains(g)));
        }
    }
}

#[test]
fn test_unknown_emotion_is_an_error() {
    let recommender = build_recommender(sci_fi_catalog());
    let err = recommender.recommend("not_a_real_emotion", 5, 6.0).unwrap_err();
    assert!(matches!(err, RecommendError::UnknownEmotion(_)));
}

#[test]
fn test_find_nonsense_is_empty() {
    let recommender = build_recommender(sci_fi_catalog());
    assert!(recommender.find("zzzznotamovie").is_empty());
    assert!(recommender.find("").is_empty());
}

#[test]
fn test_empty_results_are_not_errors() {
    let recommender = build_recommender(sci_fi_catalog());
    assert!(recommender.rank(1, 5, 0.99).unwrap().is_empty());
    assert!(recommender.recommend("fear", 5, 10.0).unwrap().is_empty());
    assert!(recommender.recommend_by_genres(["Western"], 5, 0.0).unwrap().is_empty());
}

#[test]
fn test_load_from_json_file() {
    let path = std::env::temp_dir().join(format!("movie-recs-scenario-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"[
            {{"id": 1, "title": "The Matrix", "overview": "hacker discovers simulated reality",
              "genres": "['Action', 'Science Fiction']", "vote_average": 8.7, "popularity": 50}},
            {{"id": 2, "title": "the matrix", "overview": "duplicate row"}},
            {{"id": 3, "title": "Blank", "overview": ""}},
            {{"id": 4, "title": "Hackers", "overview": "teen hacker uncovers a plot",
              "genres": ["Action", "Crime"], "vote_average": "6.3"}}
        ]"#
    )
    .unwrap();
    drop(file);

    let recommender = Recommender::from_file(&path, RecommenderConfig::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(recommender.catalog().len(), 2);
    let results = recommender.rank(1, 5, 0.1).unwrap();
    assert_eq!(results[0].movie.title, "Hackers");
}
