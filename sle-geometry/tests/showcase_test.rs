use sle_geometry::errors::SleGeometryError;
use sle_geometry::hyperplane::Hyperplane;
use sle_geometry::sle::Solution;
use sle_geometry::system::LinearSystem;
use sle_geometry::vector::Vector;

use std::sync::Once;

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
            .try_init();
    });
}

fn system_of(rows: &[([&str; 3], &str)]) -> Result<LinearSystem, SleGeometryError> {
    let planes = rows
        .iter()
        .map(|(normal, constant)| Hyperplane::plane(Vector::parse(normal)?, constant.parse()?))
        .collect::<Result<Vec<_>, _>>()?;
    LinearSystem::try_with(planes)
}

#[test]
fn showcase_reduce_and_solve() -> Result<(), SleGeometryError> {
    init_logging();

    let systems = [
        system_of(&[
            (["5.862", "1.178", "-10.366"], "-8.15"),
            (["-2.391", "-0.589", "5.183"], "-4.075"),
        ])?,
        system_of(&[
            (["8.631", "5.112", "-1.816"], "-5.113"),
            (["4.315", "11.132", "-5.27"], "-6.775"),
            (["-2.158", "3.01", "-1.727"], "-0.831"),
        ])?,
        system_of(&[
            (["5.262", "2.739", "-9.878"], "-3.441"),
            (["5.111", "6.358", "7.638"], "-2.152"),
            (["2.016", "-9.92", "-1.367"], "-9.278"),
            (["2.167", "-13.543", "-18.883"], "-10.567"),
        ])?,
    ];

    let mut outcomes = Vec::new();
    for system in &systems {
        let rref = system.rref();
        let solution = system.solve()?;
        println!("{}\n->\n{}\n", rref, solution);
        outcomes.push(solution);
    }

    assert_eq!(outcomes[0], Solution::NoSolution);
    assert!(matches!(outcomes[1], Solution::Infinite(_)));
    assert_eq!(outcomes[2], Solution::NoSolution);

    Ok(())
}

#[test]
fn showcase_solution_as_json() -> Result<(), SleGeometryError> {
    init_logging();

    let system = system_of(&[
        (["1", "0", "1"], "2"),
        (["0", "1", "0.5"], "3"),
    ])?;
    let json = serde_json::to_string_pretty(&system.solve()?)?;
    dbg!(&json);

    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["kind"], "infinite");
    assert_eq!(value["value"]["basepoint"], serde_json::json!(["2", "3", "0"]));
    assert_eq!(
        value["value"]["direction_vectors"],
        serde_json::json!([["-1", "-0.5", "1"]])
    );

    Ok(())
}
