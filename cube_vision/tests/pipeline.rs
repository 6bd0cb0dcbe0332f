use cube_vision::core_modules::face_resolver::ColorScheme;
use cube_vision::core_modules::orientation::CubeTopology;
use cube_vision::{
    CubePipeline, FaceLabel, FaceScan, FaceletString, ParallelPipeline, PipelineConfig,
    ScanError, StickerColor,
};
use image::{Rgb, RgbImage};

const IMAGE_SIDE: u32 = 300;
const WINDOW_ORIGIN: u32 = 60;
const CELL_SIDE: u32 = 60;
const CELL_GAP: u32 = 4;

/// The facelet string of the synthetic cube built by `canonical_scan`.
const EXPECTED_FACELETS: &str = concat!(
    "UBULURUFU", // Up
    "RURFRBRDR", // Right
    "FUFLFRFDF", // Front
    "DFDLDRDBD", // Down
    "LULBLFLDL", // Left
    "BUBRBLBDB", // Back
);

fn rgb(color: StickerColor) -> Rgb<u8> {
    match color {
        StickerColor::White => Rgb([255, 255, 255]),
        StickerColor::Red => Rgb([200, 20, 20]),
        StickerColor::Orange => Rgb([255, 140, 0]),
        StickerColor::Yellow => Rgb([255, 230, 0]),
        StickerColor::Green => Rgb([0, 180, 60]),
        StickerColor::Blue => Rgb([20, 40, 220]),
        StickerColor::Unknown => Rgb([30, 30, 30]),
    }
}

/// A face whose corners and center carry its own color and whose edges show the
/// canonical neighbors. Every color ends up on exactly nine stickers.
fn canonical_scan(label: FaceLabel) -> FaceScan {
    let scheme = ColorScheme::default();
    let [top, right, bottom, left] = CubeTopology::default()
        .neighbors(label)
        .map(|neighbor| scheme.color_of(neighbor));
    let own = scheme.color_of(label);
    FaceScan::new(
        label.index() + 1,
        [own, top, own, left, own, right, own, bottom, own],
    )
}

/// Paints nine stickers on a dark background, the way a phone photo frames a face.
fn render(scan: &FaceScan) -> RgbImage {
    let mut image = RgbImage::from_pixel(IMAGE_SIDE, IMAGE_SIDE, Rgb([30, 30, 30]));
    for (index, &color) in scan.stickers.iter().enumerate() {
        let col = index as u32 % 3;
        let row = index as u32 / 3;
        let x0 = WINDOW_ORIGIN + col * CELL_SIDE + CELL_GAP;
        let y0 = WINDOW_ORIGIN + row * CELL_SIDE + CELL_GAP;
        for y in y0..y0 + CELL_SIDE - 2 * CELL_GAP {
            for x in x0..x0 + CELL_SIDE - 2 * CELL_GAP {
                image.put_pixel(x, y, rgb(color));
            }
        }
    }
    image
}

/// Photographs of every face in U, R, F, D, L, B order, each turned clockwise by
/// the matching entry of `turns`.
fn photographs(turns: [u8; 6]) -> Vec<RgbImage> {
    FaceLabel::ALL
        .iter()
        .zip(turns)
        .map(|(&label, turn)| render(&canonical_scan(label).rotated(turn)))
        .collect()
}

fn pipeline() -> CubePipeline {
    CubePipeline::new(PipelineConfig::default()).unwrap()
}

#[test]
fn upright_photographs_reconstruct_the_cube() {
    let reconstruction = pipeline().process_images(&photographs([0; 6])).unwrap();
    assert_eq!(reconstruction.facelets.as_str(), EXPECTED_FACELETS);
    assert_eq!(reconstruction.rotations, [0; 6]);
    assert_eq!(reconstruction.facelets.letter_counts(), [9; 6]);
}

#[test]
fn photograph_order_does_not_matter() {
    let mut images = photographs([0; 6]);
    images.reverse();
    let reconstruction = pipeline().process_images(&images).unwrap();
    assert_eq!(reconstruction.facelets.as_str(), EXPECTED_FACELETS);
    assert_eq!(reconstruction.state.face(FaceLabel::Up).input_index, 6);
}

#[test]
fn upside_down_front_is_turned_back() {
    let reconstruction = pipeline()
        .process_images(&photographs([0, 0, 2, 0, 0, 0]))
        .unwrap();
    assert_eq!(reconstruction.facelets.as_str(), EXPECTED_FACELETS);
    assert_eq!(reconstruction.rotation(FaceLabel::Front), 2);
}

#[test]
fn quarter_turned_faces_are_corrected() {
    let reconstruction = pipeline()
        .process_images(&photographs([1, 0, 0, 3, 0, 2]))
        .unwrap();
    assert_eq!(reconstruction.facelets.as_str(), EXPECTED_FACELETS);
    assert_eq!(reconstruction.rotation(FaceLabel::Up), 3);
    assert_eq!(reconstruction.rotation(FaceLabel::Down), 1);
    assert_eq!(reconstruction.rotation(FaceLabel::Back), 2);
    assert_eq!(reconstruction.rotation(FaceLabel::Right), 0);
}

#[test]
fn misread_corner_is_reported_by_color() {
    let mut right = canonical_scan(FaceLabel::Right);
    right.stickers[0] = StickerColor::Blue;
    let mut images = photographs([0; 6]);
    images[FaceLabel::Right.index()] = render(&right);

    let err = pipeline().process_images(&images).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, ScanError::ColorImbalance { unknown: 0, .. }));
    assert!(message.contains("red x8"), "{message}");
    assert!(message.contains("blue x10"), "{message}");
}

#[test]
fn same_face_twice_is_rejected() {
    let mut images = photographs([0; 6]);
    images[FaceLabel::Back.index()] = render(&canonical_scan(FaceLabel::Front));

    let err = pipeline().process_images(&images).unwrap_err();
    assert!(matches!(
        err,
        ScanError::DuplicateFace {
            face: FaceLabel::Front,
            first_scan: 3,
            second_scan: 6,
            ..
        }
    ));
}

#[test]
fn five_photographs_are_rejected() {
    let images = photographs([0; 6]);
    assert!(matches!(
        pipeline().process_images(&images[..5]),
        Err(ScanError::WrongScanCount { found: 5 })
    ));
}

#[test]
fn tiny_photograph_is_named_in_the_error() {
    let mut images = photographs([0; 6]);
    images[3] = RgbImage::new(4, 4);

    let err = pipeline().process_images(&images).unwrap_err();
    assert!(err.to_string().starts_with("scan #4:"), "{err}");
    assert!(matches!(
        err,
        ScanError::ImageTooSmall {
            input_index: 4,
            width: 4,
            height: 4
        }
    ));
}

#[tokio::test]
async fn tiny_photograph_is_named_by_the_parallel_pipeline() {
    let mut images = photographs([0; 6]);
    images[3] = RgbImage::new(4, 4);

    let err = ParallelPipeline::new(PipelineConfig::default())
        .unwrap()
        .process_images(images)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::ImageTooSmall { input_index: 4, .. }));
}

#[test]
fn hand_entered_scans_skip_sampling() {
    let scans: Vec<FaceScan> = FaceLabel::ALL
        .iter()
        .map(|&label| canonical_scan(label))
        .collect();
    let reconstruction = pipeline().reconstruct(&scans).unwrap();
    assert_eq!(
        reconstruction.facelets,
        FaceletString::parse(EXPECTED_FACELETS).unwrap()
    );
}

#[test]
fn solver_moves_are_returned() {
    let solver = |facelets: &FaceletString| -> Result<Vec<String>, String> {
        assert_eq!(facelets.as_str(), EXPECTED_FACELETS);
        Ok(vec!["R".to_string(), "U2".to_string()])
    };
    let solution = pipeline().solve(&photographs([0; 6]), &solver).unwrap();
    assert_eq!(solution.moves, vec!["R", "U2"]);
    assert_eq!(solution.reconstruction.facelets.as_str(), EXPECTED_FACELETS);
}

#[test]
fn solver_refusal_is_surfaced_verbatim() {
    let solver = |_: &FaceletString| -> Result<Vec<String>, String> {
        Err("Error 7: one corner has to be twisted".to_string())
    };
    let err = pipeline().solve(&photographs([0; 6]), &solver).unwrap_err();
    match err {
        ScanError::Solver(reason) => {
            assert_eq!(reason, "Error 7: one corner has to be twisted")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn parallel_pipeline_matches_sequential() {
    let turns = [0, 1, 2, 3, 0, 1];
    let sequential = pipeline().process_images(&photographs(turns)).unwrap();
    let parallel = ParallelPipeline::new(PipelineConfig::default())
        .unwrap()
        .process_images(photographs(turns))
        .await
        .unwrap();
    assert_eq!(parallel, sequential);
}
