use crate::model::track::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Previous,
    Next,
}

/// Nearest playable neighbour of `current_id` in `tracks`. Tracks without a
/// preview clip are stepped over. There is no wraparound, and an id missing
/// from the list has no neighbours.
pub fn adjacent<'a>(tracks: &'a [Track], current_id: &str, step: Step) -> Option<&'a Track> {
    let index = tracks.iter().position(|t| t.id == current_id)?;
    match step {
        Step::Previous => tracks[..index].iter().rev().find(|t| t.is_playable()),
        Step::Next => tracks[index + 1..].iter().find(|t| t.is_playable()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: format!("t{i}"),
                name: format!("Track {i}"),
                artist_names: String::new(),
                album_name: String::new(),
                duration_ms: 30_000,
                preview_url: Some(format!("https://p/{i}.mp3")),
                image_url: None,
            })
            .collect()
    }

    #[test]
    fn next_and_previous_move_by_one() {
        let list = tracks(5);
        for i in 0..5 {
            let id = format!("t{i}");
            let next = adjacent(&list, &id, Step::Next).map(|t| t.id.clone());
            let prev = adjacent(&list, &id, Step::Previous).map(|t| t.id.clone());

            if i == 4 {
                assert_eq!(next, None);
            } else {
                assert_eq!(next, Some(format!("t{}", i + 1)));
            }
            if i == 0 {
                assert_eq!(prev, None);
            } else {
                assert_eq!(prev, Some(format!("t{}", i - 1)));
            }
        }
    }

    #[test]
    fn single_track_has_no_neighbours() {
        let list = tracks(1);
        assert_eq!(adjacent(&list, "t0", Step::Next), None);
        assert_eq!(adjacent(&list, "t0", Step::Previous), None);
    }

    #[test]
    fn tracks_without_preview_are_stepped_over() {
        let mut list = tracks(5);
        list[1].preview_url = None;
        list[3].preview_url = None;

        let id = |t: Option<&Track>| t.map(|t| t.id.clone());
        assert_eq!(id(adjacent(&list, "t0", Step::Next)), Some("t2".to_string()));
        assert_eq!(id(adjacent(&list, "t2", Step::Next)), Some("t4".to_string()));
        assert_eq!(id(adjacent(&list, "t4", Step::Previous)), Some("t2".to_string()));
        assert_eq!(id(adjacent(&list, "t2", Step::Previous)), Some("t0".to_string()));

        list[4].preview_url = None;
        assert_eq!(adjacent(&list, "t2", Step::Next), None);
    }

    #[test]
    fn unknown_track_has_no_neighbours() {
        let list = tracks(3);
        assert_eq!(adjacent(&list, "gone", Step::Next), None);
        assert_eq!(adjacent(&list, "gone", Step::Previous), None);
        assert_eq!(adjacent(&[], "t0", Step::Next), None);
    }
}
