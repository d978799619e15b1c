use crate::algorithm::floyd_warshall::FloydWarshall;
use crate::algorithm::parallel::{BarrierStrategy, ParallelFloydWarshall};
use crate::algorithm::AllPairsShortestPath;
use crate::matrix::DistanceMatrix;

#[repr(C)]
pub struct FfiMatrix {
    matrix: DistanceMatrix<f32>,
}

#[no_mangle]
pub extern "C" fn fw_matrix_new(dimension: usize) -> *mut FfiMatrix {
    Box::into_raw(Box::new(FfiMatrix {
        matrix: DistanceMatrix::new(dimension),
    }))
}

/// Returns false when an index is out of range
#[no_mangle]
pub extern "C" fn fw_matrix_set(m: *mut FfiMatrix, i: usize, j: usize, value: f32) -> bool {
    if m.is_null() {
        return false;
    }
    let matrix = &mut unsafe { &mut *m }.matrix;
    if i >= matrix.dimension() || j >= matrix.dimension() {
        return false;
    }
    matrix.set(i, j, value);
    true
}

/// Returns NaN for a null handle or an index out of range
#[no_mangle]
pub extern "C" fn fw_matrix_get(m: *const FfiMatrix, i: usize, j: usize) -> f32 {
    if m.is_null() {
        return f32::NAN;
    }
    let matrix = &unsafe { &*m }.matrix;
    if i >= matrix.dimension() || j >= matrix.dimension() {
        return f32::NAN;
    }
    matrix.get(i, j)
}

#[no_mangle]
pub extern "C" fn fw_matrix_dimension(m: *const FfiMatrix) -> usize {
    if m.is_null() {
        return 0;
    }
    unsafe { &*m }.matrix.dimension()
}

#[no_mangle]
pub extern "C" fn fw_matrix_free(m: *mut FfiMatrix) {
    if !m.is_null() {
        unsafe {
            drop(Box::from_raw(m));
        }
    }
}

/// Runs an engine without letting a panic unwind across the C ABI
fn run_engine<A: AllPairsShortestPath<f32>>(m: *mut FfiMatrix, engine: A) -> bool {
    if m.is_null() {
        return false;
    }
    let matrix = &mut unsafe { &mut *m }.matrix;
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| engine.compute(matrix)));
    match result {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            log::error!("{}: {}", engine.name(), e);
            false
        }
        Err(_) => {
            log::error!("{}: panicked", engine.name());
            false
        }
    }
}

#[no_mangle]
pub extern "C" fn fw_run_sequential(m: *mut FfiMatrix) -> bool {
    run_engine(m, FloydWarshall::new())
}

/// `persistent` selects the counting-barrier workers instead of fork-join rounds
#[no_mangle]
pub extern "C" fn fw_run_parallel(m: *mut FfiMatrix, num_threads: usize, persistent: bool) -> bool {
    let strategy = if persistent {
        BarrierStrategy::Persistent
    } else {
        BarrierStrategy::ForkJoin
    };
    run_engine(
        m,
        ParallelFloydWarshall::new()
            .with_strategy(strategy)
            .with_num_threads(num_threads),
    )
}
