use super::*;
use crate::foundation::core::{Canvas, Point};
use crate::render::surface::RecordingSurface;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn seeded_session_holds_only_the_root() {
    let s = GrowthSession::seeded(SessionId(3), None);
    assert_eq!(s.id(), SessionId(3));
    assert_eq!(s.pending().len(), 1);
    assert_eq!(s.pending().iter().next(), Some(&Branch::root()));
    assert_eq!(s.stats().segments_drawn, 0);
}

#[test]
fn running_the_whole_tree_draws_every_branch_once() {
    let engine = GrowthEngine::default();
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    let mut surface = RecordingSurface::new(Canvas {
        width: 100,
        height: 100,
    });
    let mut session = GrowthSession::seeded(SessionId(1), None);

    // Run generation by generation until the first four are done.
    for _ in 0..4 {
        let batch = session.pending_mut().partition(|_| false);
        session.run_frame(&engine, batch, &mut rng, &mut surface);
    }

    let stats = session.stats();
    // 1 + 2 + 4 + 8 segments, and 16 children of depth 4 are waiting.
    assert_eq!(stats.segments_drawn, 15);
    assert_eq!(surface.line_count(), 15);
    assert_eq!(session.pending().len(), 16);
    assert!(session.pending().iter().all(|b| b.depth == 4));
    assert_eq!(stats.max_depth_drawn, 3);
    assert_eq!(stats.frames_advanced, 4);
    assert_eq!(stats.continuations_enqueued, 1 + 2 + 4 + 8 + 16);
}

#[test]
fn drawn_lines_form_a_connected_tree() {
    let engine = GrowthEngine::default();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut surface = RecordingSurface::new(Canvas {
        width: 100,
        height: 100,
    });
    let mut session = GrowthSession::seeded(SessionId(1), None);
    for _ in 0..10 {
        let batch = session.pending_mut().partition(|_| false);
        session.run_frame(&engine, batch, &mut rng, &mut surface);
    }

    let lines: Vec<_> = surface.lines().collect();
    assert_eq!(lines[0].0, Point::ORIGIN);
    for (i, (from, _)) in lines.iter().enumerate().skip(1) {
        assert!(
            lines[..i].iter().any(|(_, to)| to == from),
            "segment {i} does not grow from an earlier segment"
        );
    }
}

#[test]
fn tiny_ceiling_still_grows_the_first_four_generations() {
    let engine = GrowthEngine::new(crate::growth::engine::GrowthParams {
        max_pending: Some(1),
        ..Default::default()
    });
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut surface = RecordingSurface::new(Canvas {
        width: 100,
        height: 100,
    });
    let mut session = GrowthSession::seeded(SessionId(1), Some(1));
    for _ in 0..4 {
        let batch = session.pending_mut().partition(|_| false);
        session.run_frame(&engine, batch, &mut rng, &mut surface);
    }

    assert_eq!(session.stats().segments_drawn, 15);
    assert_eq!(session.stats().continuations_dropped, 0);
    assert_eq!(session.pending().len(), 16);
}
