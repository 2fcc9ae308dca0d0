/// Asserts that two floats agree within an absolute tolerance.
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r): (f64, f64) = ($left, $right);
        assert!(
            (l - r).abs() <= $tol,
            "{} and {} differ by more than {}",
            l,
            r,
            $tol
        );
    };
}

/// Asserts that every individual in a population has been developed.
#[macro_export]
macro_rules! assert_all_developed {
    ($population:expr) => {
        for individual in &$population.individuals {
            assert!(
                individual.is_developed(),
                "Individual {} was not developed",
                individual.id
            );
        }
    };
}
