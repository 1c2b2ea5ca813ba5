use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use filmbet::{
    film::{Film, FilmSnapshot},
    types::Rating,
};

fn hash_of(film: &Film) -> u64 {
    let mut h = DefaultHasher::new();
    film.hash(&mut h);
    h.finish()
}

#[test]
fn equality_ignores_runtime_poster_and_rating() {
    let bare = Film::new("Inception", "/film/inception/");
    let rich = Film::new("Inception", "/film/inception/")
        .with_runtime(148)
        .with_poster("https://img/inception.jpg")
        .with_rating(Rating::from_half_stars(9).expect("rating"));

    assert_eq!(bare, rich);
    assert_eq!(hash_of(&bare), hash_of(&rich));
}

#[test]
fn title_or_url_mismatch_is_a_different_film() {
    let a = Film::new("Solaris", "/film/solaris/");
    assert_ne!(a, Film::new("Solaris", "/film/solaris-2002/"));
    assert_ne!(a, Film::new("Solyaris", "/film/solaris/"));
}

#[test]
fn difference_is_forward_only_and_ignores_details() {
    let old = FilmSnapshot::from_films(
        "/ann/list/",
        [
            Film::new("Heat", "/film/heat/"),
            Film::new("Ran", "/film/ran/"),
        ],
    );
    let new = FilmSnapshot::from_films(
        "/ann/list/",
        [
            Film::new("Heat", "/film/heat/").with_runtime(170),
            Film::new("Dune", "/film/dune/").with_runtime(155),
        ],
    );

    let added = new.difference(&old);
    assert_eq!(added.len(), 1);
    assert!(added.contains(&Film::new("Dune", "/film/dune/")));

    let removed = old.difference(&new);
    assert_eq!(removed.len(), 1);
    assert!(removed.contains(&Film::new("Ran", "/film/ran/")));

    assert!(new.difference(&new).is_empty());
}

#[test]
fn empty_snapshots_are_valid_and_equal_per_list() {
    let a = FilmSnapshot::empty("/l/");
    let b = FilmSnapshot::from_films("/l/", []);
    assert!(a.is_empty());
    assert_eq!(a, b);
    assert_eq!(a.watchtime(), 0);
}

#[test]
fn snapshot_equality_ignores_order_and_details() {
    let a = FilmSnapshot::from_films(
        "/l/",
        [Film::new("A", "/a/"), Film::new("B", "/b/").with_runtime(90)],
    );
    let b = FilmSnapshot::from_films("/l/", [Film::new("B", "/b/"), Film::new("A", "/a/")]);
    assert_eq!(a, b);
}

#[test]
fn rating_label_is_empty_when_absent() {
    assert_eq!(Film::new("A", "/a/").rating_label(), "");
    let rated = Film::new("A", "/a/").with_rating(Rating::from_half_stars(4).expect("rating"));
    assert_eq!(rated.rating_label(), "★★");
}
