//! Standings order and place assignment.

use crate::{member::Member, types::Place};

/// Sorts `members` by `(film_count, watchtime)` descending and assigns places.
///
/// The sort is stable, so members with equal keys keep their prior relative
/// order. Equal keys share a place and the next distinct key takes the
/// following place (1, 1, 2).
pub fn rank_members(members: &mut [Member]) {
    members.sort_by(|a, b| b.score().cmp(&a.score()));

    let places = shared_places(members.iter().map(Member::score));
    for (member, place) in members.iter_mut().zip(places) {
        member.set_rank(place);
    }
}

/// Places for keys already in descending order.
pub fn shared_places<K: PartialEq>(ordered_keys: impl IntoIterator<Item = K>) -> Vec<Place> {
    let mut out = Vec::new();
    let mut place: Place = 0;
    let mut last: Option<K> = None;

    for key in ordered_keys {
        if last.as_ref() != Some(&key) {
            place += 1;
        }
        out.push(place);
        last = Some(key);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::shared_places;

    #[test]
    fn ties_share_and_next_place_follows() {
        assert_eq!(shared_places([5, 5, 4, 3, 3, 1]), vec![1, 1, 2, 3, 3, 4]);
        assert!(shared_places(Vec::<u8>::new()).is_empty());
    }
}
