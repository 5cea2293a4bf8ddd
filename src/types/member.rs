//! Group member types
//!
//! Members are opaque identities with display attributes that are only echoed
//! back in reports. The engine never mutates a member.

use super::transaction::GroupId;

/// Member identifier
pub type MemberId = String;

/// A member of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Opaque identity, unique within a group
    pub id: MemberId,

    /// Display name
    pub name: String,

    /// Contact email (display only)
    pub email: String,

    /// Avatar URL (display only, may be empty)
    pub avatar: String,
}

impl Member {
    /// Create a member with an id and display name and no email or avatar
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Member {
            id: id.into(),
            name: name.into(),
            email: String::new(),
            avatar: String::new(),
        }
    }
}

/// Membership record read from the collaborator's CSV input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Group the member belongs to
    pub group: GroupId,

    /// The member
    pub member: Member,
}
