use gmid_core::device::{DeviceFamily, DeviceParameters};
use gmid_core::history::Session;
use gmid_core::sweep::{SweepPoint, SweepResult};

fn params(width_um: f64) -> DeviceParameters {
    DeviceParameters::new(DeviceFamily::NmosLv, width_um * 1e-6, 1e-6)
}

fn result(tag: f64) -> SweepResult {
    SweepResult {
        points: vec![SweepPoint {
            vgs: tag,
            id: 1e-6,
            gm: 1e-3,
            gds: 1e-5,
            cgg: 1e-15,
            gm_id: 1e3,
            gm_gds: 100.0,
            ft: 1e9,
        }],
    }
}

#[test]
fn first_commit_sets_current_without_history() {
    let mut session = Session::new(2);
    assert!(session.commit(params(1.0), result(1.0)));
    assert!(session.current.is_some());
    assert!(session.history.is_empty());
}

#[test]
fn three_runs_at_depth_two_keep_ranked_pair() {
    // Runs A, B, C in order: current=C, history=[B(rank1), A(rank2)].
    let mut session = Session::new(2);
    session.commit(params(1.0), result(1.0));
    session.commit(params(2.0), result(2.0));
    session.commit(params(3.0), result(3.0));

    let current = session.current.as_ref().unwrap();
    assert_eq!(current.result.points[0].vgs, 3.0);

    let ranked: Vec<(usize, f64)> = session
        .ranked()
        .map(|(rank, entry)| (rank, entry.result.points[0].vgs))
        .collect();
    assert_eq!(ranked, vec![(1, 2.0), (2, 1.0)]);
}

#[test]
fn history_length_is_bounded() {
    // After N successful runs at depth D: history length = min(N-1, D).
    let depth = 3;
    let mut session = Session::new(depth);
    for n in 1..=6 {
        session.commit(params(n as f64), result(n as f64));
        assert_eq!(session.history.len(), (n - 1).min(depth));
    }
    // Oldest evicted first: run 1 and 2 are gone.
    let ranks: Vec<f64> = session
        .ranked()
        .map(|(_, entry)| entry.result.points[0].vgs)
        .collect();
    assert_eq!(ranks, vec![5.0, 4.0, 3.0]);
}

#[test]
fn empty_result_never_mutates_session() {
    let mut session = Session::new(2);
    session.commit(params(1.0), result(1.0));
    session.commit(params(2.0), result(2.0));

    let before = session.clone();
    assert!(!session.commit(params(9.0), SweepResult::new()));
    assert_eq!(session, before);
}

#[test]
fn entry_keeps_producing_parameters() {
    let mut session = Session::new(2);
    session.commit(params(7.0), result(1.0));
    session.commit(params(8.0), result(2.0));
    let (_, superseded) = session.ranked().next().unwrap();
    assert!((superseded.params.width - 7e-6).abs() < 1e-15);
}

#[test]
fn params_changed_tracks_last_committed() {
    let mut session = Session::new(2);
    assert!(session.params_changed(&params(1.0)));
    session.commit(params(1.0), result(1.0));
    assert!(!session.params_changed(&params(1.0)));
    assert!(session.params_changed(&params(2.0)));
}

#[test]
fn zero_depth_clamps_to_one() {
    let mut session = Session::new(0);
    session.commit(params(1.0), result(1.0));
    session.commit(params(2.0), result(2.0));
    session.commit(params(3.0), result(3.0));
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.history[0].result.points[0].vgs, 2.0);
}

#[test]
fn clear_resets_session() {
    let mut session = Session::new(2);
    session.commit(params(1.0), result(1.0));
    session.clear();
    assert!(session.current.is_none());
    assert!(session.history.is_empty());
    assert!(session.last_params.is_none());
}
