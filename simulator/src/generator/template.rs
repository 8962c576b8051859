/// Angle of the `index`-th frame for a servo sweeping 0° → 180° → 0° in
/// `step_deg` increments.
pub fn sweep_angle(index: u64, step_deg: u16) -> u16 {
    let step = u64::from(step_deg.clamp(1, 180));
    let position = (index * step) % 360;
    if position > 180 {
        (360 - position) as u16
    } else {
        position as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_turns_around_at_both_ends() {
        let angles: Vec<u16> = (0..8).map(|index| sweep_angle(index, 60)).collect();
        assert_eq!(angles, vec![0, 60, 120, 180, 120, 60, 0, 60]);
    }

    #[test]
    fn sweep_never_leaves_half_plane() {
        assert!((0..1000).all(|index| sweep_angle(index, 7) <= 180));
    }
}
