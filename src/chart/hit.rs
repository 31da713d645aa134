/// Index of the sample whose mapped x-pixel is nearest the pointer.
/// Linear scan; ties resolve to the first sample found.
pub fn nearest_index(px: &[(f64, f64)], pointer_x: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (x, _)) in px.iter().enumerate() {
        let dist = (x - pointer_x).abs();
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((i, dist)),
        }
    }
    best.map(|(i, _)| i)
}
