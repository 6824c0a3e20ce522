//! Landmark-to-score conversion.

use deskwell_core::{HeadAlignment, PostureStatus};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::estimator::{Keypoint, Landmark, PoseEstimator, PoseLandmarks};

/// Shoulder y-delta above which the uneven-shoulders deduction applies.
const SHOULDER_ALIGNMENT_LIMIT: f32 = 0.05;

/// Result of analyzing one frame.
#[derive(Debug, Clone)]
pub struct ScoredFrame {
    /// Annotated image at the original resolution
    pub image: RgbImage,
    /// Status label
    pub status: PostureStatus,
    /// Posture quality, 0..=100
    pub score: u8,
}

/// Converts frames into scores using an injected estimator.
///
/// Stateless between calls except for the last computed status/score,
/// which is kept for the orchestrator's convenience only.
pub struct PoseScorer<E> {
    estimator: E,
    process_width: u32,
    last: Option<(PostureStatus, u8)>,
}

impl<E: PoseEstimator> PoseScorer<E> {
    /// Create a scorer with the default processing width (640).
    pub fn new(estimator: E) -> Self {
        Self {
            estimator,
            process_width: 640,
            last: None,
        }
    }

    /// Override the maximum width handed to the estimator.
    pub fn with_process_width(mut self, process_width: u32) -> Self {
        self.process_width = process_width;
        self
    }

    /// Status and score of the most recent analysis.
    pub fn last(&self) -> Option<(PostureStatus, u8)> {
        self.last
    }

    /// Analyze one image: detect landmarks, compute the score, draw the
    /// landmark overlay, and return the result at original resolution.
    pub fn analyze(&mut self, image: &RgbImage) -> ScoredFrame {
        let (width, height) = image.dimensions();

        // Downscale wider frames before inference; landmarks are
        // normalized, so relative angles are unaffected.
        let downscaled = width > self.process_width;
        let mut working = if downscaled {
            let scale = self.process_width as f32 / width as f32;
            let new_height = ((height as f32 * scale) as u32).max(1);
            imageops::resize(image, self.process_width, new_height, FilterType::Triangle)
        } else {
            image.clone()
        };

        let (status, score) = match self.estimator.detect(&working) {
            None => (PostureStatus::NoPersonDetected, 0),
            Some(landmarks) => match extract_required(&landmarks) {
                None => {
                    tracing::debug!("expected keypoint missing, marking analysis error");
                    (PostureStatus::AnalysisError, 0)
                }
                Some(points) => {
                    let neck_angle = angle_at_vertex(
                        points.left_ear,
                        points.left_shoulder,
                        points.left_hip,
                    );
                    let shoulder_alignment =
                        (points.left_shoulder.y - points.right_shoulder.y).abs();

                    let (score, status) = score_pose(neck_angle, shoulder_alignment);
                    draw_overlay(&mut working, &landmarks);
                    (status, score)
                }
            },
        };

        let image = if downscaled {
            imageops::resize(&working, width, height, FilterType::Triangle)
        } else {
            working
        };

        self.last = Some((status, score));
        ScoredFrame {
            image,
            status,
            score,
        }
    }
}

struct RequiredPoints {
    left_shoulder: Landmark,
    right_shoulder: Landmark,
    left_ear: Landmark,
    left_hip: Landmark,
}

fn extract_required(landmarks: &PoseLandmarks) -> Option<RequiredPoints> {
    // All six must be present even though scoring only reads four; a
    // detection missing any of them is structurally suspect.
    for keypoint in Keypoint::ALL {
        landmarks.get(keypoint)?;
    }
    Some(RequiredPoints {
        left_shoulder: landmarks.get(Keypoint::LeftShoulder)?,
        right_shoulder: landmarks.get(Keypoint::RightShoulder)?,
        left_ear: landmarks.get(Keypoint::LeftEar)?,
        left_hip: landmarks.get(Keypoint::LeftHip)?,
    })
}

/// Angle in degrees at vertex `b`, formed by rays to `a` and to `c`,
/// normalized into `[0, 180]`.
fn angle_at_vertex(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

/// Apply the deduction table to a neck angle and shoulder alignment.
///
/// Score starts at 100: head-forward deducts 30 (outside `[160, 180]`)
/// or 15 (`[160, 170)`), uneven shoulders independently deduct 20.
pub fn score_pose(neck_angle: f32, shoulder_alignment: f32) -> (u8, PostureStatus) {
    let mut score: i32 = 100;

    let head = if neck_angle < 160.0 || neck_angle > 180.0 {
        score -= 30;
        HeadAlignment::PoorForward
    } else if neck_angle < 170.0 {
        score -= 15;
        HeadAlignment::FairForward
    } else {
        HeadAlignment::Good
    };

    let shoulders_uneven = shoulder_alignment > SHOULDER_ALIGNMENT_LIMIT;
    if shoulders_uneven {
        score -= 20;
    }

    (
        score.clamp(0, 100) as u8,
        PostureStatus::Scored {
            head,
            shoulders_uneven,
        },
    )
}

/// Skeleton segments drawn between detected keypoints.
const SEGMENTS: [(Keypoint, Keypoint); 6] = [
    (Keypoint::LeftEar, Keypoint::LeftShoulder),
    (Keypoint::RightEar, Keypoint::RightShoulder),
    (Keypoint::LeftShoulder, Keypoint::RightShoulder),
    (Keypoint::LeftShoulder, Keypoint::LeftHip),
    (Keypoint::RightShoulder, Keypoint::RightHip),
    (Keypoint::LeftHip, Keypoint::RightHip),
];

const SEGMENT_COLOR: Rgb<u8> = Rgb([230, 230, 230]);
const MARKER_COLOR: Rgb<u8> = Rgb([0, 200, 80]);

fn draw_overlay(image: &mut RgbImage, landmarks: &PoseLandmarks) {
    for (a, b) in SEGMENTS {
        if let (Some(a), Some(b)) = (landmarks.get(a), landmarks.get(b)) {
            draw_segment(image, a, b);
        }
    }
    for (_, landmark) in landmarks.iter() {
        draw_marker(image, landmark);
    }
}

fn to_pixel(image: &RgbImage, landmark: Landmark) -> (i64, i64) {
    let x = (landmark.x * (image.width().saturating_sub(1)) as f32).round() as i64;
    let y = (landmark.y * (image.height().saturating_sub(1)) as f32).round() as i64;
    (x, y)
}

fn put_pixel_checked(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_segment(image: &mut RgbImage, a: Landmark, b: Landmark) {
    let (x0, y0) = to_pixel(image, a);
    let (x1, y1) = to_pixel(image, b);
    let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = x0 + ((x1 - x0) as f32 * t).round() as i64;
        let y = y0 + ((y1 - y0) as f32 * t).round() as i64;
        put_pixel_checked(image, x, y, SEGMENT_COLOR);
    }
}

fn draw_marker(image: &mut RgbImage, landmark: Landmark) {
    let (cx, cy) = to_pixel(image, landmark);
    for dy in -1..=1 {
        for dx in -1..=1 {
            put_pixel_checked(image, cx + dx, cy + dy, MARKER_COLOR);
        }
    }
}
