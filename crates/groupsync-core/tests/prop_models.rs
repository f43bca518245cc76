use groupsync_core::{GroupSyncable, GroupSyncablePatch, GroupSyncableType};
use proptest::prelude::*;

fn syncable_type() -> impl Strategy<Value = GroupSyncableType> {
    prop_oneof![Just(GroupSyncableType::Team), Just(GroupSyncableType::Channel)]
}

proptest! {
    #[test]
    fn patch_never_changes_identity(
        group_id in "[A-Za-z0-9]{1,26}",
        syncable_id in "[A-Za-z0-9]{1,26}",
        kind in syncable_type(),
        auto_add in any::<bool>(),
        can_leave in any::<bool>(),
    ) {
        let patch = GroupSyncablePatch { auto_add, can_leave };
        let syncable = GroupSyncable::from_patch(&group_id, &syncable_id, kind, &patch);
        prop_assert_eq!(syncable.group_id, group_id);
        prop_assert_eq!(syncable.syncable_id, syncable_id);
        prop_assert_eq!(syncable.syncable_type, kind);
        prop_assert_eq!(syncable.auto_add, auto_add);
        prop_assert_eq!(syncable.can_leave, can_leave);
    }

    #[test]
    fn unknown_type_names_are_rejected(name in "[A-Za-z]{1,12}") {
        prop_assume!(name != "Team" && name != "Channel");
        let parsed = name.parse::<GroupSyncableType>();
        prop_assert!(parsed.is_err());
    }
}
