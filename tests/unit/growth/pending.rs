use super::*;

fn at_depth(depth: u32) -> Branch {
    Branch {
        depth,
        ..Branch::root()
    }
}

#[test]
fn partition_keeps_order_on_both_sides() {
    let mut pending = PendingWork::new(None);
    for d in 0..6 {
        assert_eq!(pending.push(at_depth(d)), Admission::Admitted);
    }

    let run_now = pending.partition(|b| b.depth % 2 == 0);
    let ran: Vec<u32> = run_now.iter().map(|b| b.depth).collect();
    let kept: Vec<u32> = pending.iter().map(|b| b.depth).collect();
    assert_eq!(ran, vec![1, 3, 5]);
    assert_eq!(kept, vec![0, 2, 4]);
}

#[test]
fn partition_keep_all_and_run_all() {
    let mut pending = PendingWork::new(None);
    pending.push(at_depth(0));
    pending.push(at_depth(1));

    assert!(pending.partition(|_| true).is_empty());
    assert_eq!(pending.len(), 2);

    assert_eq!(pending.partition(|_| false).len(), 2);
    assert!(pending.is_empty());
}

#[test]
fn ceiling_drops_overflow() {
    let mut pending = PendingWork::new(Some(2));
    assert_eq!(pending.push(at_depth(0)), Admission::Admitted);
    assert_eq!(pending.push(at_depth(1)), Admission::Admitted);
    assert!(pending.is_full());
    assert_eq!(pending.push(at_depth(2)), Admission::Dropped);
    assert_eq!(pending.len(), 2);

    pending.partition(|b| b.depth == 0);
    assert!(!pending.is_full());
    assert_eq!(pending.push(at_depth(3)), Admission::Admitted);
}

#[test]
fn clear_empties_but_keeps_ceiling() {
    let mut pending = PendingWork::new(Some(8));
    pending.push(at_depth(0));
    pending.clear();
    assert!(pending.is_empty());
    assert_eq!(pending.ceiling(), Some(8));
}

#[test]
fn serializes_as_inspectable_json() {
    let mut pending = PendingWork::new(None);
    pending.push(Branch::root());
    let json = serde_json::to_value(&pending).unwrap();
    assert_eq!(json["items"][0]["depth"], 0);
    assert_eq!(json["items"][0]["length"], 1.0);
}
