pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]);
    assert!(result.is_err());
}

#[test]
fn test_from_fn() {
    let m = Matrix::from_fn(3, 3, |i, j| i < j);
    assert_eq!(m.shape(), (3, 3));
    assert!(m.get(0, 1));
    assert!(!m.get(1, 1));
    assert!(!m.get(2, 0));
    assert_eq!(m.count_true(), 3);
}

#[test]
fn test_zeros() {
    let m = Matrix::<f32>::zeros(2, 3);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions");
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert!((t.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((t.get(0, 1) - 4.0).abs() < 1e-6);
    assert!((t.get(2, 1) - 6.0).abs() < 1e-6);
}

#[test]
fn test_matmul() {
    let a = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let b = Matrix::from_vec(3, 2, vec![7.0_f32, 8.0, 9.0, 10.0, 11.0, 12.0]).expect("valid");
    let c = a.matmul(&b).expect("inner dimensions match");
    assert_eq!(c.shape(), (2, 2));
    // [1 2 3] . [7 9 11]^T = 7 + 18 + 33 = 58
    assert!((c.get(0, 0) - 58.0).abs() < 1e-5);
    assert!((c.get(0, 1) - 64.0).abs() < 1e-5);
    assert!((c.get(1, 0) - 139.0).abs() < 1e-5);
    assert!((c.get(1, 1) - 154.0).abs() < 1e-5);
}

#[test]
fn test_matmul_dimension_error() {
    let a = Matrix::<f32>::zeros(2, 3);
    let b = Matrix::<f32>::zeros(2, 3);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_hadamard() {
    let a = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).expect("valid");
    let b = Matrix::from_vec(2, 2, vec![2.0_f32, 0.0, 0.5, 1.0]).expect("valid");
    let c = a.hadamard(&b).expect("shapes match");
    assert!((c.get(0, 0) - 2.0).abs() < 1e-6);
    assert!((c.get(0, 1) - 0.0).abs() < 1e-6);
    assert!((c.get(1, 0) - 1.5).abs() < 1e-6);
}

#[test]
fn test_add_sub() {
    let a = Matrix::from_vec(1, 2, vec![1.0_f32, 2.0]).expect("valid");
    let b = Matrix::from_vec(1, 2, vec![0.5_f32, 0.5]).expect("valid");
    let sum = a.add(&b).expect("shapes match");
    let diff = a.sub(&b).expect("shapes match");
    assert!((sum.get(0, 0) - 1.5).abs() < 1e-6);
    assert!((diff.get(0, 1) - 1.5).abs() < 1e-6);
}

#[test]
fn test_mul_scalar() {
    let a = Matrix::from_vec(1, 2, vec![1.0_f32, -2.0]).expect("valid");
    let b = a.mul_scalar(3.0);
    assert!((b.get(0, 0) - 3.0).abs() < 1e-6);
    assert!((b.get(0, 1) + 6.0).abs() < 1e-6);
}

#[test]
fn test_column_sums() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let sums = m.column_sums();
    assert_eq!(sums.len(), 3);
    assert!((sums[0] - 5.0).abs() < 1e-6);
    assert!((sums[1] - 7.0).abs() < 1e-6);
    assert!((sums[2] - 9.0).abs() < 1e-6);
}

#[test]
fn test_sum_squares() {
    let m = Matrix::from_vec(1, 3, vec![1.0_f32, 2.0, -2.0]).expect("valid");
    assert!((m.sum_squares() - 9.0).abs() < 1e-6);
}

#[test]
fn test_row_extraction() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let r = m.row(1);
    assert_eq!(r.len(), 3);
    assert!((r[0] - 4.0).abs() < 1e-6);
    assert!((r[2] - 6.0).abs() < 1e-6);
}
