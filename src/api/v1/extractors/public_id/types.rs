/**
 * Responsibility
 *  - one tagged id type per resource exposed through public ids
 *  - no decode logic here (see core)
 */
use super::core::{PublicId, PublicResource};

pub enum PostTag {}

impl PublicResource for PostTag {
    const NAME: &'static str = "post";
}

pub type PublicPostId = PublicId<PostTag>;
