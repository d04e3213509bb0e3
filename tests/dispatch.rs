//! Tests for the direction-optimizing `mxv`/`vxm` dispatcher.
//!
//! These cover the conversion policy (including the row-only fallback), the
//! strategy table, descriptor bookkeeping, masks, accumulation, and agreement
//! between push and pull against a dense reference.

use graphmv::{
    Descriptor, Direction, GrbError, Info, Input, LoadBalance, MaskMode, Matrix, NO_MASK, Plus, PlusMultiplies,
    Storage, TransposeMode, Vector, mxv, vxm,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Directed path 0 -> 1 -> 2 -> 3.
fn path_graph() -> Matrix<f64> {
    let mut a = Matrix::new(4, 4);
    a.build(&[0, 1, 2], &[1, 2, 3], &[1.0, 1.0, 1.0], 3, None).unwrap();
    a
}

fn unit(n: usize, i: usize) -> Vector<f64> {
    let mut v = Vector::new(n);
    v.set_element(1.0, i).unwrap();
    v
}

/// One BFS-style step along the path gives `{1: 1.0}` in every load-balance
/// mode, and the engine reports a push.
#[test]
fn path_step_in_every_load_balance_mode() {
    let a = path_graph();
    let s = PlusMultiplies::<f64>::new();
    for lb in [LoadBalance::Simple, LoadBalance::ThreadWarpBlock, LoadBalance::Merge] {
        let mut desc = Descriptor::new().with_load_balance(lb);
        let mut u = unit(4, 0);
        let mut w = Vector::new(4);
        let res = vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc);
        if lb == LoadBalance::ThreadWarpBlock && !cfg!(feature = "rayon") {
            assert!(matches!(res, Err(GrbError::NotImplemented(_))));
            continue;
        }
        res.unwrap();
        assert_eq!(w.extract_tuples(0.0), (vec![1], vec![1.0]), "mode {lb}");
        assert_eq!(w.storage(), Storage::Sparse);
        assert_eq!(desc.last_direction(), Some(Direction::PushOnly));
    }
}

/// A row-only asymmetric matrix forces `vxm`'s dense vector sparse even
/// under `PullOnly`.
#[test]
fn row_only_matrix_forces_push_for_vxm() {
    let a = path_graph();
    let mut desc = Descriptor::new().with_direction(Direction::PullOnly);
    let mut u = Vector::new(4);
    u.build_dense(&[1.0, 0.0, 0.0, 0.0]).unwrap();
    let mut w = Vector::new(4);
    vxm(&mut w, NO_MASK, None, &PlusMultiplies::<f64>::new(), &mut u, &a, &mut desc).unwrap();
    assert_eq!(u.storage(), Storage::Sparse);
    assert_eq!(desc.last_direction(), Some(Direction::PushOnly));
    assert_eq!(w.extract_tuples(0.0), (vec![1], vec![1.0]));
}

/// For plain `mxv` the rows are the pull orientation, so the row-only rule
/// densifies a sparse vector even under `PushOnly`.
#[test]
fn row_only_matrix_forces_pull_for_mxv() {
    let a = path_graph();
    let mut desc = Descriptor::new().with_direction(Direction::PushOnly);
    let mut u = unit(4, 1);
    let mut w = Vector::new(4);
    mxv(&mut w, NO_MASK, None, &PlusMultiplies::<f64>::new(), &a, &mut u, &mut desc).unwrap();
    assert_eq!(u.storage(), Storage::Dense);
    assert_eq!(w.storage(), Storage::Dense);
    assert_eq!(desc.last_direction(), Some(Direction::PullOnly));
    assert_eq!(w.extract_tuples(0.0), (vec![0], vec![1.0]));
}

/// With both orientations available the configured mode decides.
#[test]
fn csc_matrix_follows_configured_direction() {
    let mut a = path_graph();
    a.materialize_csc().unwrap();
    let s = PlusMultiplies::<f64>::new();

    let mut desc = Descriptor::new().with_direction(Direction::PullOnly);
    let mut u = unit(4, 0);
    let mut w = Vector::new(4);
    vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc).unwrap();
    assert_eq!(u.storage(), Storage::Dense);
    assert_eq!(desc.last_direction(), Some(Direction::PullOnly));
    assert_eq!(w.extract_tuples(0.0), (vec![1], vec![1.0]));

    let mut desc = Descriptor::new().with_direction(Direction::PushOnly);
    let mut u = unit(4, 1);
    let mut w = Vector::new(4);
    mxv(&mut w, NO_MASK, None, &s, &a, &mut u, &mut desc).unwrap();
    assert_eq!(u.storage(), Storage::Sparse);
    assert_eq!(desc.last_direction(), Some(Direction::PushOnly));
    assert_eq!(w.extract_tuples(0.0), (vec![0], vec![1.0]));
}

/// A symmetric flag lets rows stand in for columns in both directions.
#[test]
fn symmetric_matrix_serves_both_directions() {
    let mut a = Matrix::new(3, 3);
    a.build(&[0, 1, 1, 2], &[1, 0, 2, 1], &[1.0, 1.0, 1.0, 1.0], 4, None).unwrap();
    a.set_symmetric(true).unwrap();
    let s = PlusMultiplies::<f64>::new();
    for dir in [Direction::PushOnly, Direction::PullOnly] {
        let mut desc = Descriptor::new().with_direction(dir);
        let mut u = unit(3, 1);
        let mut w = Vector::new(3);
        vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc).unwrap();
        assert_eq!(w.extract_tuples(0.0), (vec![0, 2], vec![1.0, 1.0]));
        assert_eq!(desc.last_direction(), Some(dir));
    }
}

fn random_graph(rng: &mut StdRng, n: usize, density: f64) -> (Matrix<f64>, Vec<Vec<f64>>) {
    let mut dense = vec![vec![0.0; n]; n];
    let (mut rows, mut cols, mut vals) = (Vec::new(), Vec::new(), Vec::new());
    for (i, row) in dense.iter_mut().enumerate() {
        for (j, slot) in row.iter_mut().enumerate() {
            if rng.gen_bool(density) {
                let v = rng.gen_range(1..6) as f64;
                *slot = v;
                rows.push(i);
                cols.push(j);
                vals.push(v);
            }
        }
    }
    let mut a = Matrix::new(n, n);
    a.build(&rows, &cols, &vals, vals.len(), None).unwrap();
    (a, dense)
}

/// Every direction and load-balance mode agrees with a dense reference.
#[test]
fn push_and_pull_agree_with_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 40;
    let (mut a, dense) = random_graph(&mut rng, n, 0.15);
    a.materialize_csc().unwrap();
    let s = PlusMultiplies::<f64>::new();

    let mut x = vec![0.0; n];
    for slot in x.iter_mut() {
        if rng.gen_bool(0.2) {
            *slot = rng.gen_range(1..4) as f64;
        }
    }
    let expect_vxm: Vec<f64> = (0..n).map(|i| (0..n).map(|j| x[j] * dense[j][i]).sum()).collect();
    let expect_mxv: Vec<f64> = (0..n).map(|i| (0..n).map(|j| dense[i][j] * x[j]).sum()).collect();
    let tuples = |d: &[f64]| -> (Vec<usize>, Vec<f64>) {
        d.iter().enumerate().filter(|&(_, &v)| v != 0.0).map(|(i, &v)| (i, v)).unzip()
    };

    for dir in [Direction::PushOnly, Direction::PullOnly, Direction::PushPull] {
        for lb in [LoadBalance::Simple, LoadBalance::Merge] {
            let mut desc = Descriptor::new().with_direction(dir).with_load_balance(lb);

            let mut u = Vector::new(n);
            u.build_dense(&x).unwrap();
            let mut w = Vector::new(n);
            vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc).unwrap();
            assert_eq!(w.extract_tuples(0.0), tuples(&expect_vxm), "vxm {dir} {lb}");

            let mut u = Vector::new(n);
            u.build_dense(&x).unwrap();
            let mut w = Vector::new(n);
            mxv(&mut w, NO_MASK, None, &s, &a, &mut u, &mut desc).unwrap();
            assert_eq!(w.extract_tuples(0.0), tuples(&expect_mxv), "mxv {dir} {lb}");
        }
    }
}

/// `mxv` with a transposed matrix slot is `vxm`.
#[test]
fn transposed_mxv_matches_vxm() {
    let a = path_graph();
    let s = PlusMultiplies::<f64>::new();
    let mut desc = Descriptor::new();
    desc.set_transpose(Input::Inp0, TransposeMode::Transpose);
    let mut u = unit(4, 2);
    let mut w = Vector::new(4);
    mxv(&mut w, NO_MASK, None, &s, &a, &mut u, &mut desc).unwrap();
    assert_eq!(w.extract_tuples(0.0), (vec![3], vec![1.0]));
    assert_eq!(desc.last_direction(), Some(Direction::PushOnly));
}

/// `vxm` restores its transpose toggle on success and on failure.
#[test]
fn vxm_restores_descriptor() {
    let a = path_graph();
    let s = PlusMultiplies::<f64>::new();
    let mut desc = Descriptor::new();
    let mut u = unit(4, 0);
    let mut w = Vector::new(4);
    vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc).unwrap();
    assert_eq!(desc.transpose(Input::Inp1), TransposeMode::Default);

    let mut short = Vector::new(3);
    let res = vxm(&mut short, NO_MASK, None, &s, &mut u, &a, &mut desc);
    assert!(matches!(res, Err(GrbError::InvalidValue(_))));
    assert_eq!(desc.transpose(Input::Inp1), TransposeMode::Default);
}

/// Transposing the vector slot is rejected before anything else happens.
#[test]
fn transposing_both_slots_is_invalid() {
    let a = path_graph();
    let s = PlusMultiplies::<f64>::new();
    let mut u = unit(4, 0);
    let mut w = Vector::new(4);

    let mut desc = Descriptor::new();
    desc.set_transpose(Input::Inp0, TransposeMode::Transpose);
    let res = vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc);
    assert_eq!(Info::from(&res), Info::InvalidValue);
    assert_eq!(desc.transpose(Input::Inp1), TransposeMode::Default);
    assert_eq!(desc.last_direction(), None);

    let mut desc = Descriptor::new();
    desc.set_transpose(Input::Inp1, TransposeMode::Transpose);
    let res = mxv(&mut w, NO_MASK, None, &s, &a, &mut u, &mut desc);
    assert_eq!(Info::from(&res), Info::InvalidValue);
}

#[test]
fn unbuilt_operands_are_uninitialized() {
    let s = PlusMultiplies::<f64>::new();
    let a = Matrix::<f64>::new(4, 4);
    let mut u = unit(4, 0);
    let mut w = Vector::new(4);
    let res = vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut Descriptor::new());
    assert_eq!(Info::from(&res), Info::Uninitialized);

    let mut empty = Matrix::<f64>::new(0, 0);
    empty.build(&[], &[], &[], 0, None).unwrap();
    let mut u = Vector::new(0);
    let mut w = Vector::new(0);
    let res = mxv(&mut w, NO_MASK, None, &s, &empty, &mut u, &mut Descriptor::new());
    assert_eq!(Info::from(&res), Info::Uninitialized);
}

/// Masks restrict the written indices; complement inverts them.
#[test]
fn mask_and_complement() {
    let mut a = Matrix::new(4, 4);
    a.build(&[0, 0, 0], &[1, 2, 3], &[1.0, 2.0, 3.0], 3, None).unwrap();
    let s = PlusMultiplies::<f64>::new();
    let mut mask = Vector::<bool>::new(4);
    mask.set_element(true, 2).unwrap();

    for lb in [LoadBalance::Merge, LoadBalance::Simple] {
        let mut desc = Descriptor::new().with_load_balance(lb);
        let mut u = unit(4, 0);
        let mut w = Vector::new(4);
        vxm(&mut w, Some(&mask), None, &s, &mut u, &a, &mut desc).unwrap();
        assert_eq!(w.extract_tuples(0.0), (vec![2], vec![2.0]));

        desc.set_mask_mode(MaskMode::Complement);
        vxm(&mut w, Some(&mask), None, &s, &mut u, &a, &mut desc).unwrap();
        assert_eq!(w.extract_tuples(0.0), (vec![1, 3], vec![1.0, 3.0]));
    }
}

/// With an accumulator the previous output entries are combined, not replaced.
#[test]
fn accumulate_into_existing_output() {
    let mut a = path_graph();
    a.materialize_csc().unwrap();
    let s = PlusMultiplies::<f64>::new();
    for dir in [Direction::PushOnly, Direction::PullOnly] {
        for lb in [LoadBalance::Merge, LoadBalance::Simple] {
            let mut desc = Descriptor::new().with_direction(dir).with_load_balance(lb);
            let mut w = Vector::new(4);
            w.build(&[1, 3], &[5.0, 2.0], 2, None).unwrap();
            let mut u = unit(4, 0);
            vxm(&mut w, NO_MASK, Some(&Plus), &s, &mut u, &a, &mut desc).unwrap();
            assert_eq!(w.extract_tuples(0.0), (vec![1, 3], vec![6.0, 2.0]), "{dir} {lb}");
        }
    }
}

/// Without an accumulator the previous output is discarded.
#[test]
fn output_is_replaced_without_accumulator() {
    let a = path_graph();
    let mut w = Vector::new(4);
    w.fill(9.0).unwrap();
    let mut u = unit(4, 1);
    vxm(&mut w, NO_MASK, None, &PlusMultiplies::<f64>::new(), &mut u, &a, &mut Descriptor::new()).unwrap();
    assert_eq!(w.extract_tuples(0.0), (vec![2], vec![1.0]));
}

/// A kernel that cannot run leaves the previous output untouched, even when
/// the semiring identity differs from the element default.
#[cfg(not(feature = "rayon"))]
#[test]
fn failed_kernel_keeps_previous_output() {
    let a = path_graph();
    let s = graphmv::MinPlus::<f64>::new();
    let mut w = Vector::new(4);
    w.set_element(5.0, 2).unwrap();
    let before = w.clone();
    let mut u = Vector::new(4);
    u.set_element(0.0, 0).unwrap();
    for accum in [None, Some(&graphmv::Min as &dyn graphmv::BinaryOp<f64>)] {
        let mut desc = Descriptor::new().with_load_balance(LoadBalance::ThreadWarpBlock);
        let res = vxm(&mut w, NO_MASK, accum, &s, &mut u, &a, &mut desc);
        assert!(matches!(res, Err(GrbError::NotImplemented(_))));
        assert_eq!(w, before);
        assert_eq!(w.extract_tuples(f64::INFINITY), (vec![2], vec![5.0]));
    }
}

/// Dense matrices run GeMV; a sparse vector against them is densified.
#[test]
fn dense_matrix_uses_gemv() {
    let mut a = Matrix::new(3, 3);
    a.build_dense(&[0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 3.0, 0.0, 0.0]).unwrap();
    let s = PlusMultiplies::<f64>::new();

    let mut desc = Descriptor::new().with_direction(Direction::PushOnly);
    let mut u = Vector::new(3);
    u.set_element(1.0, 0).unwrap();
    let mut w = Vector::new(3);
    vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc).unwrap();
    assert_eq!(w.extract_tuples(0.0), (vec![1], vec![1.0]));
    assert_eq!(desc.last_direction(), Some(Direction::PullOnly));

    let mut u = Vector::new(3);
    u.fill(1.0).unwrap();
    let mut w = Vector::new(3);
    mxv(&mut w, NO_MASK, None, &s, &a, &mut u, &mut desc).unwrap();
    assert_eq!(w.as_dense().unwrap(), &[1.0, 2.0, 3.0]);
}

/// Per-call partition count through the descriptor does not change results.
#[test]
fn thread_count_option_is_honored() {
    let mut rng = StdRng::seed_from_u64(11);
    let (a, _) = random_graph(&mut rng, 64, 0.1);
    let s = PlusMultiplies::<f64>::new();
    let mut baseline = None;
    for p in ["1", "3", "8"] {
        let mut desc = Descriptor::new();
        desc.set_option("nthreads", p).unwrap();
        desc.set_option("direction", "push").unwrap();
        let mut u = Vector::new(64);
        u.build(&[0, 5, 17, 40], &[1.0, 2.0, 3.0, 4.0], 4, None).unwrap();
        let mut w = Vector::new(64);
        vxm(&mut w, NO_MASK, None, &s, &mut u, &a, &mut desc).unwrap();
        let t = w.extract_tuples(0.0);
        match &baseline {
            None => baseline = Some(t),
            Some(b) => assert_eq!(&t, b),
        }
    }
}

/// Debug mode only adds log records.
#[test]
fn debug_mode_is_observational() {
    let a = path_graph();
    let mut desc = Descriptor::new();
    desc.set_debug(true);
    let mut u = unit(4, 0);
    let mut w = Vector::new(4);
    vxm(&mut w, NO_MASK, None, &PlusMultiplies::<f64>::new(), &mut u, &a, &mut desc).unwrap();
    assert_eq!(w.extract_tuples(0.0), (vec![1], vec![1.0]));
}
