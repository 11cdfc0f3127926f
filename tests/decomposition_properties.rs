use eigenspace::datasets::{disjoint_cliques, gene_network};
use eigenspace::spectral::{
    build_laplacian, eigen_decompose, LaplacianBuilder, LaplacianKind, SpectralProfile,
};
use eigenspace::{
    CommunitySampler, DecompositionVerifier, EigenResult, SampleConfig, SpectralError,
    SymmetricMatrix, SymmetryPolicy,
};
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const TOLERANCE: f64 = 1e-6;

fn random_symmetric(n: usize, seed: u64) -> SymmetricMatrix {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut matrix = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in i..n {
            let value = rng.gen_range(-5.0f64..5.0f64);
            matrix[(i, j)] = value;
            matrix[(j, i)] = value;
        }
    }
    SymmetricMatrix::new(matrix).expect("symmetric by construction")
}

fn assert_sound(source: &SymmetricMatrix, eigen: &EigenResult) {
    assert!(eigen.converged, "residual {}", eigen.residual);
    assert!(
        eigen.orthonormality_error() < TOLERANCE,
        "orthonormality error {}",
        eigen.orthonormality_error()
    );
    assert!(
        eigen.reconstruction_error(source) < TOLERANCE,
        "reconstruction error {}",
        eigen.reconstruction_error(source)
    );
    assert!((eigen.trace() - source.trace()).abs() < TOLERANCE);
    for pair in eigen.values.windows(2) {
        assert!(pair[0] <= pair[1], "values not ascending: {:?}", eigen.values);
    }
    let report = DecompositionVerifier::verify(source, eigen, TOLERANCE);
    assert!(report.is_valid, "{}", report.explanation);
}

#[test]
fn random_symmetric_matrices_decompose_soundly() {
    for n in 1..=12 {
        for seed in 0..3 {
            let matrix = random_symmetric(n, seed * 100 + n as u64);
            let eigen = eigen_decompose(&matrix);
            assert_eq!(eigen.len(), n);
            assert_sound(&matrix, &eigen);
        }
    }
}

#[test]
fn community_laplacians_decompose_soundly() {
    for seed in [1, 2, 3, 42] {
        let graph = CommunitySampler::sample(&SampleConfig {
            seed: Some(seed),
            ..SampleConfig::default()
        })
        .expect("community graph");
        let laplacian = build_laplacian(&graph.adjacency).expect("laplacian");
        let eigen = eigen_decompose(&laplacian);
        assert_sound(&laplacian, &eigen);
        assert!(eigen.values[0].abs() < TOLERANCE);
        assert!(eigen.values[0] > -TOLERANCE, "laplacian is positive semidefinite");
    }
}

#[test]
fn decomposition_is_deterministic() {
    let matrix = random_symmetric(10, 9);
    let first = eigen_decompose(&matrix);
    let second = eigen_decompose(&matrix);
    assert_eq!(first, second);
}

#[test]
fn two_by_two_scenario() {
    let matrix = SymmetricMatrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
    let eigen = eigen_decompose(&matrix);
    assert!((eigen.values[0] - 1.0).abs() < TOLERANCE);
    assert!((eigen.values[1] - 3.0).abs() < TOLERANCE);

    let h = 1.0 / 2.0f64.sqrt();
    let low = &eigen.vectors[0];
    let high = &eigen.vectors[1];
    let low_sign = low[0].signum();
    let high_sign = high[0].signum();
    assert!((low[0] * low_sign - h).abs() < TOLERANCE);
    assert!((low[1] * low_sign + h).abs() < TOLERANCE);
    assert!((high[0] * high_sign - h).abs() < TOLERANCE);
    assert!((high[1] * high_sign - h).abs() < TOLERANCE);
}

#[test]
fn identity_scenario() {
    let eigen = eigen_decompose(&SymmetricMatrix::identity(4));
    assert_eq!(eigen.values, vec![1.0, 1.0, 1.0, 1.0]);
    assert!(eigen.orthonormality_error() < TOLERANCE);
}

#[test]
fn laplacian_rows_sum_to_zero() {
    for seed in 0..5 {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let n = 10;
        let mut adjacency = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                if rng.gen::<f64>() < 0.4 {
                    let weight = rng.gen_range(0.1f64..7.0f64);
                    adjacency[(i, j)] = weight;
                    adjacency[(j, i)] = weight;
                }
            }
        }
        let adjacency = SymmetricMatrix::new(adjacency).expect("adjacency");
        let laplacian = build_laplacian(&adjacency).expect("laplacian");
        for sum in laplacian.row_sums() {
            assert!(sum.abs() < 1e-9, "row sum {sum}");
        }
    }
}

#[test]
fn connected_graph_has_constant_null_vector() {
    let laplacian = build_laplacian(&gene_network()).expect("laplacian");
    let eigen = eigen_decompose(&laplacian);
    assert!(eigen.values[0].abs() < TOLERANCE);
    assert!(eigen.values[1] > TOLERANCE);

    let null = &eigen.vectors[0];
    let expected = 1.0 / (null.len() as f64).sqrt();
    let sign = null[0].signum();
    for component in null.iter() {
        assert!((component * sign - expected).abs() < TOLERANCE);
    }
}

#[test]
fn disjoint_triangles_have_two_zero_eigenvalues() {
    let laplacian = build_laplacian(&disjoint_cliques(2, 3)).expect("laplacian");
    let eigen = eigen_decompose(&laplacian);
    let profile = SpectralProfile::from_eigen(&eigen);
    assert_eq!(profile.zero_multiplicity(TOLERANCE), 2);
    for value in &eigen.values[2..] {
        assert!((value - 3.0).abs() < TOLERANCE);
    }
    assert!(profile.algebraic_connectivity().unwrap().abs() < TOLERANCE);
}

#[test]
fn normalized_laplacian_spectrum_is_bounded() {
    let graph = CommunitySampler::sample(&SampleConfig {
        seed: Some(5),
        ..SampleConfig::default()
    })
    .expect("community graph");
    let normalized = LaplacianBuilder::build(&graph.adjacency, LaplacianKind::SymmetricNormalized)
        .expect("normalized laplacian");
    let eigen = eigen_decompose(&normalized);
    assert_sound(&normalized, &eigen);
    for value in &eigen.values {
        assert!(*value > -TOLERANCE && *value < 2.0 + TOLERANCE, "{value}");
    }
}

#[test]
fn asymmetric_input_is_rejected_or_symmetrized() {
    let raw = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    let err = SymmetricMatrix::new(raw.clone()).unwrap_err();
    assert!(matches!(err, SpectralError::AsymmetricInput { row: 0, col: 1, .. }));

    let averaged = SymmetricMatrix::with_policy(raw, SymmetryPolicy::Symmetrize).unwrap();
    let eigen = eigen_decompose(&averaged);
    assert_sound(&averaged, &eigen);
    assert!((eigen.values[0]).abs() < TOLERANCE);
    assert!((eigen.values[2] - 2.0).abs() < TOLERANCE);
}

#[test]
fn non_square_input_fails_fast() {
    let err = SymmetricMatrix::new(DMatrix::zeros(3, 2)).unwrap_err();
    assert_eq!(err, SpectralError::InvalidShape { rows: 3, cols: 2 });
}
