use faer::Mat;
use ferreus_planar::{
    find_bracket, generate_random_points, save_triangulation_obj, DelaunayTriangulator,
    PlanarInterpolator, PlanarTriangulator, TimeInstant,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Source points scattered on a tilted plane, carrying a temperature field.
    let n = 200usize;
    let xy = generate_random_points(n, 2, Some(7));
    let source = Mat::from_fn(n, 3, |i, j| match j {
        0 => *xy.get(i, 0),
        1 => *xy.get(i, 1),
        _ => 0.2 * *xy.get(i, 0) + 0.1 * *xy.get(i, 1),
    });
    let values = Mat::from_fn(n, 1, |i, _| 300.0 + 50.0 * *xy.get(i, 0));

    // Destination points: a regular grid of face centres on the same plane.
    let g = 10usize;
    let dest = Mat::from_fn(g * g, 3, |i, j| {
        let x = 0.2 + 0.6 * (i % g) as f64 / (g - 1) as f64;
        let y = 0.2 + 0.6 * (i / g) as f64 / (g - 1) as f64;
        match j {
            0 => x,
            1 => y,
            _ => 0.2 * x + 0.1 * y,
        }
    });

    let interp = PlanarInterpolator::builder(source.clone(), dest).build()?;
    let mapped = interp.interpolate(values.as_ref())?;

    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for i in 0..mapped.nrows() {
        lo = lo.min(*mapped.get(i, 0));
        hi = hi.max(*mapped.get(i, 0));
    }
    println!(
        "remapped {} source values onto {} face centres, range [{:.2}, {:.2}]",
        interp.n_source_points(),
        interp.n_dest_points(),
        lo,
        hi
    );

    // Dump the source triangulation for visual inspection.
    let local_source = interp.reference_frame().local_position(source.as_ref());
    let mesh = DelaunayTriangulator.triangulate(local_source.as_ref());
    save_triangulation_obj("triangulation.obj", "source_triangulation", &mesh)?;
    println!("wrote triangulation.obj ({} triangles)", mesh.triangles().len());

    // Walk a snapshot time series with a caller-threaded cursor.
    let times = vec![
        TimeInstant::new("0", 0.0),
        TimeInstant::new("0.5", 0.5),
        TimeInstant::new("1", 1.0),
        TimeInstant::new("2", 2.0),
    ];
    let mut cursor = None;
    for query in [0.25, 0.6, 1.5, 5.0] {
        match find_bracket(&times, cursor, query) {
            Some(bracket) => {
                match bracket.upper {
                    Some(upper) => println!(
                        "t = {}: between snapshot {:?} and {:?}",
                        query, times[bracket.lower].name, times[upper].name
                    ),
                    None => println!(
                        "t = {}: after last snapshot {:?}",
                        query, times[bracket.lower].name
                    ),
                }
                cursor = Some(bracket.lower);
            }
            None => println!("t = {}: before all snapshots", query),
        }
    }

    Ok(())
}
