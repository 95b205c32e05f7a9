// src/core/classifier.rs

use crate::{constants::COORDINATE_DEPTH, models::Coordinate};
use std::path::{Component, Path};
use thiserror::Error;

/// Why a path does not fit the `<anchor>/<project>/<region>/<stack>` convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unrecognized {
    /// No segment equals the anchor.
    #[error("no '{anchor}' segment in path")]
    MissingAnchor {
        /// The anchor that was looked for.
        anchor: String,
    },
    /// The anchor is there but fewer than three segments follow it.
    #[error("expected 3 segments after '{anchor}', found {found}")]
    TooShallow {
        /// The anchor that was matched.
        anchor: String,
        /// How many segments follow the anchor.
        found: usize,
    },
    /// One of the coordinate segments is not valid UTF-8.
    #[error("path segment after '{anchor}' is not valid UTF-8")]
    NonUtf8Segment {
        /// The anchor that was matched.
        anchor: String,
    },
}

/// Extracts the project, region and stack names from a path.
///
/// The first segment equal to `anchor` wins; the three segments right after it are the
/// coordinate and anything deeper is ignored. Only whole segments are compared, so
/// `my-workspaces/` never matches `workspaces`.
pub fn classify(path: &Path, anchor: &str) -> Result<Coordinate, Unrecognized> {
    let mut segments = path.components().filter_map(|component| match component {
        Component::Normal(segment) => Some(segment),
        _ => None,
    });

    if !segments.any(|segment| segment == anchor) {
        return Err(Unrecognized::MissingAnchor {
            anchor: anchor.to_string(),
        });
    }

    let coordinate_segments: Vec<_> = segments.take(COORDINATE_DEPTH).collect();
    let [project, region, stack] = coordinate_segments.as_slice() else {
        return Err(Unrecognized::TooShallow {
            anchor: anchor.to_string(),
            found: coordinate_segments.len(),
        });
    };

    match (project.to_str(), region.to_str(), stack.to_str()) {
        (Some(project), Some(region), Some(stack)) => Ok(Coordinate::new(project, region, stack)),
        _ => Err(Unrecognized::NonUtf8Segment {
            anchor: anchor.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ANCHOR_SEGMENT;
    use std::path::PathBuf;

    fn classify_str(path: &str) -> Result<Coordinate, Unrecognized> {
        classify(&PathBuf::from(path), ANCHOR_SEGMENT)
    }

    #[test]
    fn test_classify_extracts_three_segments_after_anchor() {
        let coordinate =
            classify_str("/infra/workspaces/acme/us-east-2/vpc/terragrunt.hcl").unwrap();
        assert_eq!(coordinate, Coordinate::new("acme", "us-east-2", "vpc"));
    }

    #[test]
    fn test_classify_ignores_trailing_segments() {
        let coordinate = classify_str(
            "workspaces/acme/us-east-2/elasticbeanstalk/environments/sgws/terragrunt.hcl",
        )
        .unwrap();
        assert_eq!(coordinate, Coordinate::new("acme", "us-east-2", "elasticbeanstalk"));
    }

    #[test]
    fn test_classify_exactly_three_segments_is_enough() {
        // The stack segment itself may be the last segment of the path.
        let coordinate = classify_str("workspaces/acme/eu-west-1/rds").unwrap();
        assert_eq!(coordinate.stack, "rds");
    }

    #[test]
    fn test_classify_missing_anchor() {
        let result = classify_str("/infra/notes/acme/us-east-2/vpc/terragrunt.hcl");
        assert_eq!(
            result,
            Err(Unrecognized::MissingAnchor {
                anchor: ANCHOR_SEGMENT.to_string()
            })
        );
    }

    #[test]
    fn test_classify_too_few_segments_after_anchor() {
        for (path, found) in [
            ("workspaces", 0),
            ("/infra/workspaces/acme", 1),
            ("/infra/workspaces/acme/terragrunt.hcl", 2),
        ] {
            assert_eq!(
                classify_str(path),
                Err(Unrecognized::TooShallow {
                    anchor: ANCHOR_SEGMENT.to_string(),
                    found
                }),
                "path: {path}"
            );
        }
    }

    #[test]
    fn test_classify_requires_exact_segment_match() {
        let result = classify_str("/infra/my-workspaces/acme/us-east-2/vpc/terragrunt.hcl");
        assert!(matches!(result, Err(Unrecognized::MissingAnchor { .. })));

        let result = classify_str("/infra/workspaces-old/acme/us-east-2/vpc/terragrunt.hcl");
        assert!(matches!(result, Err(Unrecognized::MissingAnchor { .. })));
    }

    #[test]
    fn test_classify_uses_first_anchor() {
        let coordinate =
            classify_str("/workspaces/acme/us-east-2/workspaces/other/eu-west-1/vpc").unwrap();
        assert_eq!(coordinate, Coordinate::new("acme", "us-east-2", "workspaces"));
    }

    #[test]
    fn test_classify_custom_anchor() {
        let coordinate =
            classify(Path::new("/live/acme/us-east-1/alb/terragrunt.hcl"), "live").unwrap();
        assert_eq!(coordinate, Coordinate::new("acme", "us-east-1", "alb"));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let path = Path::new("/a/workspaces/p/r/s/terragrunt.hcl");
        assert_eq!(classify(path, ANCHOR_SEGMENT), classify(path, ANCHOR_SEGMENT));
    }
}
