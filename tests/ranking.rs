use chrono::{NaiveDate, NaiveDateTime};

use filmbet::{
    core::{contest::Contest, ranking::rank_members},
    film::{Film, FilmSnapshot},
    member::Member,
};

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 4)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .expect("timestamp")
}

/// Member whose list holds `count` films of `runtime` minutes each.
fn member_with(name: &str, count: usize, runtime: Option<u32>) -> Member {
    let list = format!("/{name}/list/");
    let films = (0..count).map(|i| {
        let film = Film::new(format!("{name} film {i}"), format!("/film/{name}-{i}/"));
        match runtime {
            Some(r) => film.with_runtime(r),
            None => film,
        }
    });
    Member::new(name, format!("/{name}/"), &list).with_snapshot(FilmSnapshot::from_films(list.clone(), films))
}

fn names(members: &[Member]) -> Vec<&str> {
    members.iter().map(|m| m.name.as_str()).collect()
}

fn places(members: &[Member]) -> Vec<Option<u32>> {
    members.iter().map(Member::rank).collect()
}

#[test]
fn exact_ties_keep_prior_order() {
    let mut ab = vec![member_with("a", 5, Some(120)), member_with("b", 5, Some(120))];
    rank_members(&mut ab);
    assert_eq!(names(&ab), vec!["a", "b"]);

    let mut ba = vec![member_with("b", 5, Some(120)), member_with("a", 5, Some(120))];
    rank_members(&mut ba);
    assert_eq!(names(&ba), vec!["b", "a"]);
}

#[test]
fn film_count_then_watchtime_descending() {
    let mut members = vec![
        member_with("short", 3, Some(80)),
        member_with("many", 4, None),
        member_with("long", 3, Some(200)),
    ];
    rank_members(&mut members);
    assert_eq!(names(&members), vec!["many", "long", "short"]);
    assert_eq!(places(&members), vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn tied_members_share_a_place_and_the_next_place_follows() {
    let mut members = vec![
        member_with("c", 3, None),
        member_with("a", 5, Some(120)),
        member_with("b", 5, Some(120)),
        member_with("d", 1, None),
        member_with("e", 1, None),
        member_with("f", 0, None),
    ];
    rank_members(&mut members);
    assert_eq!(names(&members), vec!["a", "b", "c", "d", "e", "f"]);
    assert_eq!(
        places(&members),
        vec![Some(1), Some(1), Some(2), Some(3), Some(3), Some(4)]
    );
}

#[test]
fn unranked_until_first_ranking() {
    let contest = Contest::new("c", vec![member_with("a", 1, None)]).expect("contest");
    assert_eq!(contest.members()[0].rank(), None);
    assert_eq!(contest.standings()[0].place, 1);
}

#[test]
fn standings_text_lists_members_in_place_order() {
    let list = |n: &str| format!("/{n}/list/");
    let mut ann = Member::new("ann", "/ann/", list("ann"));
    ann.reconcile(FilmSnapshot::from_films(
        list("ann"),
        [
            Film::new("Heat", "/film/heat/").with_runtime(120),
            Film::new("Ran", "/film/ran/").with_runtime(150),
        ],
    ));
    let mut bo = Member::new("bo", "/bo/", list("bo"));
    bo.reconcile(FilmSnapshot::from_films(
        list("bo"),
        [Film::new("Heat", "/film/heat/"), Film::new("Alien", "/film/alien/")],
    ));
    let cy = Member::new("cy", "/cy/", list("cy"));
    let dee = Member::new("dee", "/dee/", list("dee"));

    let mut contest = Contest::new("summer", vec![cy, bo, dee, ann]).expect("contest");
    contest.rank();
    contest.render_standings(at());

    let expected = "Standings as of 07/04 09:30:\n\
                    * 🥇 ann: 2 (+2) 4.5h\n\
                    * 🥈 bo: 2 (+2) 0.0h\n\
                    * 🥉 cy: 0 (+0) 0.0h\n\
                    * 🥉 dee: 0 (+0) 0.0h\n";
    assert_eq!(contest.standings_text(), expected);
    assert_eq!(contest.last_update(), Some(at()));
}

#[test]
fn standings_expose_new_films_for_renderers() {
    let list = "/ann/list/";
    let mut ann = Member::new("ann", "/ann/", list)
        .with_snapshot(FilmSnapshot::from_films(list, [Film::new("Heat", "/film/heat/")]));
    ann.reconcile(FilmSnapshot::from_films(
        list,
        [
            Film::new("Heat", "/film/heat/"),
            Film::new("Ran", "/film/ran/").with_poster("https://img/ran.jpg"),
            Film::new("Alien", "/film/alien/"),
        ],
    ));

    let mut contest = Contest::new("c", vec![ann]).expect("contest");
    contest.rank();
    let rows = contest.standings();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].film_count, 3);
    assert_eq!(rows[0].delta_count, 2);
    let titles: Vec<_> = rows[0].new_films.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["Alien", "Ran"]);
    assert_eq!(rows[0].new_films[1].poster_url.as_deref(), Some("https://img/ran.jpg"));
}
