use rand::SeedableRng;

use semhl_core::color::Rgb;
use semhl_core::lab::{
    clamp_lab, delta_e76, fallback_lab, fallback_palette_len, generate_lab_at_distance, Lab,
};

#[test]
fn roundtrip_black() {
    let lab = Lab::from_rgb(Rgb::new(0, 0, 0));
    assert_eq!(lab.to_rgb(), Rgb::new(0, 0, 0));
}

#[test]
fn roundtrip_white() {
    let lab = Lab::from_rgb(Rgb::new(255, 255, 255));
    assert_eq!(lab.to_rgb(), Rgb::new(255, 255, 255));
}

#[test]
fn roundtrip_in_gamut_delta_e_small() {
    for rgb in [
        Rgb::new(200, 50, 50),
        Rgb::new(20, 160, 90),
        Rgb::new(40, 80, 220),
        Rgb::new(128, 128, 128),
    ] {
        let lab = Lab::from_rgb(rgb);
        let back = Lab::from_rgb(lab.to_rgb());
        assert!(delta_e76(lab, back) <= 1.0, "roundtrip drifted for {rgb:?}");
    }
}

#[test]
fn delta_e_zero_for_identical_points() {
    let lab = Lab::new(50.0, 10.0, -10.0);
    assert_eq!(delta_e76(lab, lab), 0.0);
}

#[test]
fn delta_e_similar_colors_is_small() {
    let red = Lab::from_rgb(Rgb::from_hex("#FF0000").unwrap());
    let near_red = Lab::from_rgb(Rgb::from_hex("#FE0101").unwrap());
    assert!(delta_e76(red, near_red) < 5.0);
}

#[test]
fn delta_e_distinct_colors_is_large() {
    let red = Lab::from_rgb(Rgb::from_hex("#FF0000").unwrap());
    let blue = Lab::from_rgb(Rgb::from_hex("#0000FF").unwrap());
    assert!(delta_e76(red, blue) > 5.0);
}

#[test]
fn clamp_lab_respects_bounds() {
    let lab = Lab::new(150.0, -200.0, 200.0);
    let clamped = clamp_lab(lab, 0.0, 100.0);
    assert_eq!(clamped, Lab::new(100.0, -128.0, 127.0));
}

#[test]
fn generate_at_distance_respects_l_range() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let base = Lab::new(50.0, 0.0, 0.0);
    for _ in 0..20 {
        let lab = generate_lab_at_distance(&mut rng, base, 15.0, 60.0, 80.0);
        assert!((59.0..=81.0).contains(&lab.l), "L={} out of range", lab.l);
    }
}

#[test]
fn generate_at_distance_is_roughly_on_target() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    let base = Lab::new(50.0, 0.0, 0.0);
    for _ in 0..20 {
        let lab = generate_lab_at_distance(&mut rng, base, 15.0, 0.0, 100.0);
        let de = delta_e76(lab, base);
        assert!(de > 0.0, "generated point collapsed onto the base");
    }
}

#[test]
fn fallback_palette_wraps_around() {
    let len = fallback_palette_len();
    assert_eq!(fallback_lab(0), fallback_lab(len));
}

#[test]
fn fallback_palette_entries_are_distinct() {
    let len = fallback_palette_len();
    for i in 0..len {
        for j in (i + 1)..len {
            assert!(delta_e76(fallback_lab(i), fallback_lab(j)) > 5.0, "entries {i} and {j} collide");
        }
    }
}
